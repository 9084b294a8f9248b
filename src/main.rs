//! An item management web service with axum and MongoDB.

use item_service::app::run_app;
use item_service::feature::item::item_repository::MongoItemRepository;
use item_service::infra::{config, database, logging, state::AppState};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let _guard = logging::init_logging();
    let config = config::load_config()?;

    let collection = database::init_db(&config.database).await?;
    let repository = Arc::new(MongoItemRepository::new(collection));
    let state = AppState::new(repository);

    let listener = TcpListener::bind(format!(
        "{}:{}",
        config.server.address, config.server.port
    ))
    .await?;
    run_app(listener, state).await?;

    Ok(())
}
