use crate::app_config::{AppConfig, BackendSettings, IndexRevision, JiomartSettings};
use crate::ConfigError;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a working
/// production config pointed at the live backends.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_timeout = |var: &str, default: u64| -> Result<u64, ConfigError> {
        let secs = parse_u64(var, &default.to_string())?;
        if secs == 0 {
            return Err(invalid(var, "timeout must be at least 1 second".to_string()));
        }
        Ok(secs)
    };

    let parse_url = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        if !(raw.starts_with("http://") || raw.starts_with("https://")) {
            return Err(invalid(var, format!("'{raw}' is not an http(s) URL")));
        }
        Ok(raw.trim_end_matches('/').to_string())
    };

    let bind_addr = parse_addr("PINCART_BIND_ADDR", "0.0.0.0:5001")?;
    let log_level = or_default("PINCART_LOG_LEVEL", "info");
    let locations_path = PathBuf::from(or_default(
        "PINCART_LOCATIONS_PATH",
        "./config/locations.yaml",
    ));
    let user_agent = or_default("PINCART_USER_AGENT", DEFAULT_USER_AGENT);

    let request_timeout_secs = parse_timeout("PINCART_REQUEST_TIMEOUT_SECS", 20)?;
    let request_deadline_secs = match lookup("PINCART_REQUEST_DEADLINE_SECS") {
        Ok(_) => Some(parse_timeout("PINCART_REQUEST_DEADLINE_SECS", 0)?),
        Err(_) => None,
    };

    let dmart = BackendSettings {
        base_url: parse_url("PINCART_DMART_BASE_URL", "https://digital.dmart.in")?,
        timeout_secs: parse_timeout("PINCART_DMART_TIMEOUT_SECS", request_timeout_secs)?,
    };

    let nine_minutes = BackendSettings {
        base_url: parse_url("PINCART_NINE_MINUTES_BASE_URL", "https://9minutes.in")?,
        timeout_secs: parse_timeout("PINCART_NINE_MINUTES_TIMEOUT_SECS", request_timeout_secs)?,
    };

    let hits_per_page = or_default("PINCART_JIOMART_HITS_PER_PAGE", "20")
        .parse::<u32>()
        .map_err(|e| invalid("PINCART_JIOMART_HITS_PER_PAGE", e.to_string()))?;
    if !(1..=100).contains(&hits_per_page) {
        return Err(invalid(
            "PINCART_JIOMART_HITS_PER_PAGE",
            format!("{hits_per_page} is outside 1..=100"),
        ));
    }

    let revision = or_default("PINCART_JIOMART_REVISION", "v3")
        .parse::<IndexRevision>()
        .map_err(|reason| invalid("PINCART_JIOMART_REVISION", reason))?;

    let jiomart = JiomartSettings {
        mapping_base_url: parse_url("PINCART_JIOMART_MAPPING_BASE_URL", "https://www.jiomart.com")?,
        search_base_url: parse_url(
            "PINCART_JIOMART_SEARCH_BASE_URL",
            "https://3YP0HP3WSH-dsn.algolia.net",
        )?,
        app_id: or_default("PINCART_JIOMART_APP_ID", "3YP0HP3WSH"),
        api_key: or_default("PINCART_JIOMART_API_KEY", "aace3f18430a49e185d2c1111602e4b1"),
        index_name: or_default("PINCART_JIOMART_INDEX", "prod_mart_master_vertical"),
        hits_per_page,
        revision,
        timeout_secs: parse_timeout("PINCART_JIOMART_TIMEOUT_SECS", request_timeout_secs)?,
    };

    Ok(AppConfig {
        bind_addr,
        log_level,
        locations_path,
        user_agent,
        request_deadline_secs,
        dmart,
        nine_minutes,
        jiomart,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
