//! Layered service configuration.
//!
//! Values come from `configuration/base.yaml`, then an optional
//! `configuration/{APP_ENVIRONMENT}.yaml`, then `APP_`-prefixed environment
//! variables using `__` as the nesting separator
//! (e.g. `APP_STORAGE__SERVICE_KEY`).

use secrecy::SecretString;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub storage: StorageSettings,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct StorageSettings {
    /// Base url of the Supabase project, e.g. `https://xyz.supabase.co`.
    pub url: String,
    pub bucket: String,
    pub service_key: SecretString,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_seconds: u64,
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    dotenv::dotenv().ok();
    let base_path = std::env::current_dir()
        .map_err(|error| config::ConfigError::Foreign(Box::new(error)))?;
    let configuration_directory = base_path.join("configuration");
    let environment = dotenv::var("APP_ENVIRONMENT").unwrap_or_else(|_| "local".to_owned());

    config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(
            config::File::from(configuration_directory.join(format!("{environment}.yaml")))
                .required(false),
        )
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}
