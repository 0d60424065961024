pub mod app_config;
pub mod backends;
pub mod config;
pub mod locations;
pub mod products;
pub mod search;

pub use app_config::{AppConfig, BackendSettings, IndexRevision, JiomartSettings};
pub use backends::BackendName;
pub use config::{load_app_config, load_app_config_from_env};
pub use locations::{load_location_tables, LocationTables};
pub use products::CanonicalProduct;
pub use search::{is_valid_pincode, SearchRequest, ValidationError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read location tables at {path}: {source}")]
    LocationsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse location tables: {0}")]
    LocationsFileParse(#[source] serde_yaml::Error),

    #[error("location tables validation failed: {0}")]
    Validation(String),
}
