//! OpenAPI configuration.

use crate::feature::item::item_repository;
use crate::feature::{health::health_api, item::item_api};
use utoipa::OpenApi;

/// OpenApi configuration.
#[derive(OpenApi)]
#[openapi(
    paths(
        health_api::health,
        item_api::list_items,
        item_api::get_item,
        item_api::create_item,
        item_api::update_item,
        item_api::delete_item,
    ),
    components(
        schemas(
            health_api::HealthResponse,
            item_repository::NewItem,
            item_repository::Item,
            item_api::ItemResponse,
            item_api::ItemListResponse,
            item_api::ItemMessageResponse,
            crate::infra::error::ErrorBody,
            crate::infra::error::Detail,
            crate::infra::validation::FieldError,
        )
    )
)]
#[derive(Clone, Copy, Debug)]
pub struct ApiDoc;
