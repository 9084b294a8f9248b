//! For reading application configuration.

use serde::Deserialize;

/// Application configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// The address to listen on.
    pub address: String,
    /// The port to listen on.
    pub port: u16,
}

/// Database configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseConfig {
    /// The MongoDB connection string.
    pub uri: String,
    /// The database name.
    pub database_name: String,
    /// The collection items are stored in.
    pub collection_name: String,
}

/// Retrieve [`Config`] from the default configuration file.
///
/// Values can be overridden with `APP`-prefixed environment variables,
/// e.g. `APP_DATABASE__URI`.
#[tracing::instrument]
pub fn load_config() -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::with_name("config"))
        .add_source(config::Environment::with_prefix("app").separator("__"))
        .build()?
        .try_deserialize()?;
    Ok(config)
}
