//! For interacting with the database.

use super::config::DatabaseConfig;
use crate::feature::item::item_repository::ItemDocument;
use mongodb::{Client, Collection};

/// Connects to the database based on some configuration and returns the
/// item collection handle.
///
/// The driver connects lazily; the first operation performs the handshake.
pub async fn init_db(config: &DatabaseConfig) -> mongodb::error::Result<Collection<ItemDocument>> {
    let client = Client::with_uri_str(&config.uri).await?;
    let collection = client
        .database(&config.database_name)
        .collection::<ItemDocument>(&config.collection_name);
    tracing::info!("Connected to MongoDB database {}", config.database_name);
    Ok(collection)
}
