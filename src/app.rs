//! Application assembly.
//!
//! Builds the axum router with its middleware stack and runs the server.
//!
//! # Examples
//!
//! Health API.
//!
//! ```rust
//! # tokio_test::block_on(async {
//! let response = item_service::feature::health::health_api::health().await;
//! assert_eq!("healthy", response.0.status());
//! # });
//! ```

use crate::feature::{health, item};
use crate::infra::error::PanicHandler;
use crate::infra::middleware::MakeRequestIdSpan;
use crate::infra::openapi::ApiDoc;
use crate::infra::state::AppState;
use axum::Router;
use http::header::AUTHORIZATION;
use std::iter;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Constructs the full axum application.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .merge(api(state))
        // Layers
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(MakeRequestIdSpan)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(()),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(SetSensitiveRequestHeadersLayer::new(iter::once(
            AUTHORIZATION,
        )))
        .layer(CatchPanicLayer::custom(PanicHandler))
}

/// Constructs the REST API routes.
pub fn api(state: AppState) -> Router {
    Router::new()
        .merge(health::health_api::routes())
        .merge(item::item_api::routes())
        .with_state(state)
}

/// Starts the axum server.
pub async fn run_app(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let app = app(state).into_make_service();

    tracing::info!("Starting axum on {:?}", listener.local_addr());
    let exit_result = axum::serve(listener, app)
        .with_graceful_shutdown(crate::infra::shutdown::shutdown_signal())
        .await;

    match &exit_result {
        Ok(()) => tracing::info!("Successfully shut down"),
        Err(e) => tracing::error!("Shutdown failed: {}", e),
    }

    exit_result
}

/// Spawn a server on a random port with the given repository.
pub async fn spawn_app_with_repository(
    repository: crate::feature::item::item_repository::DynItemRepository,
) -> String {
    let address = "127.0.0.1";
    let listener = TcpListener::bind(format!("{address}:0")).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let state = AppState::new(repository);
    tokio::spawn(run_app(listener, state));
    format!("http://{address}:{port}")
}
