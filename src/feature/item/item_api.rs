//! The item API implementation.

use crate::{
    feature::item::{
        item_repository::{DynItemRepository, Item, NewItem},
        item_service,
    },
    infra::{
        error::{ApiResult, ClientError},
        extract::Json,
        state::AppState,
    },
};
use axum::{extract::State, Router};
use axum_extra::routing::{RouterExt, TypedPath};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

/// The item API endpoints.
pub fn routes() -> Router<AppState> {
    Router::new()
        .typed_post(create_item)
        .typed_get(list_items)
        .typed_get(get_item)
        .typed_put(update_item)
        .typed_delete(delete_item)
}

#[derive(Deserialize, TypedPath)]
#[typed_path("/items", rejection(ClientError))]
pub(crate) struct Items;

#[derive(Deserialize, TypedPath)]
#[typed_path("/items/:name", rejection(ClientError))]
pub(crate) struct ItemsName(String);

/// A single item.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ItemResponse {
    /// The requested item.
    pub item: Item,
}

/// Every stored item.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ItemListResponse {
    /// The stored items, in database order.
    pub items: Vec<Item>,
}

/// The outcome of a create, update, or delete.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ItemMessageResponse {
    /// A human-readable outcome message.
    #[schema(example = "Item created successfully")]
    pub message: String,
    /// The affected item.
    pub item: Item,
}

/// Creates a new item.
#[utoipa::path(
    post,
    path = "/items",
    request_body = NewItem,
    responses(
        (status = 201, description = "Created", body = ItemMessageResponse),
        (status = 409, description = "Conflict", body = ErrorBody),
        (status = 422, description = "Unprocessable Entity", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all)]
pub(crate) async fn create_item(
    Items: Items,
    State(repository): State<DynItemRepository>,
    Json(new_item): Json<NewItem>,
) -> ApiResult<(StatusCode, Json<ItemMessageResponse>)> {
    let item = item_service::create_item(repository.as_ref(), &new_item).await?;
    Ok((
        StatusCode::CREATED,
        Json(ItemMessageResponse {
            message: "Item created successfully".to_string(),
            item,
        }),
    ))
}

/// Lists all items.
#[utoipa::path(
    get,
    path = "/items",
    responses(
        (status = 200, description = "Success", body = ItemListResponse),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all)]
pub(crate) async fn list_items(
    Items: Items,
    State(repository): State<DynItemRepository>,
) -> ApiResult<Json<ItemListResponse>> {
    let items = item_service::list_items(repository.as_ref()).await?;
    Ok(Json(ItemListResponse { items }))
}

/// Gets an item by name.
#[utoipa::path(
    get,
    path = "/items/{name}",
    responses(
        (status = 200, description = "Ok", body = ItemResponse),
        (status = 404, description = "Not Found", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all)]
pub(crate) async fn get_item(
    ItemsName(name): ItemsName,
    State(repository): State<DynItemRepository>,
) -> ApiResult<Json<ItemResponse>> {
    let item = item_service::get_item(repository.as_ref(), &name).await?;
    Ok(Json(ItemResponse { item }))
}

/// Updates an item by name.
///
/// The payload's name wins: updating `/items/a` with `{"name": "b"}`
/// renames the item to `b`.
#[utoipa::path(
    put,
    path = "/items/{name}",
    request_body = NewItem,
    responses(
        (status = 200, description = "Ok", body = ItemMessageResponse),
        (status = 404, description = "Not Found", body = ErrorBody),
        (status = 422, description = "Unprocessable Entity", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all)]
pub(crate) async fn update_item(
    ItemsName(name): ItemsName,
    State(repository): State<DynItemRepository>,
    Json(new_item): Json<NewItem>,
) -> ApiResult<Json<ItemMessageResponse>> {
    let item = item_service::update_item(repository.as_ref(), &name, &new_item).await?;
    Ok(Json(ItemMessageResponse {
        message: "Item updated successfully".to_string(),
        item,
    }))
}

/// Deletes an item by name.
#[utoipa::path(
    delete,
    path = "/items/{name}",
    responses(
        (status = 200, description = "Ok", body = ItemMessageResponse),
        (status = 404, description = "Not Found", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody),
    )
)]
#[instrument(skip_all)]
pub(crate) async fn delete_item(
    ItemsName(name): ItemsName,
    State(repository): State<DynItemRepository>,
) -> ApiResult<Json<ItemMessageResponse>> {
    let item = item_service::delete_item(repository.as_ref(), &name).await?;
    Ok(Json(ItemMessageResponse {
        message: "Item deleted successfully".to_string(),
        item,
    }))
}
