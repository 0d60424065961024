use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

fn build_with(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
    let map: HashMap<&str, &str> = pairs.iter().copied().collect();
    build_app_config(lookup_from_map(&map))
}

fn assert_invalid(result: Result<AppConfig, ConfigError>, expected_var: &str) {
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == expected_var),
        "expected InvalidEnvVar({expected_var}), got: {result:?}"
    );
}

#[test]
fn empty_environment_uses_defaults() {
    let cfg = build_with(&[]).unwrap();
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:5001");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.locations_path.to_str(), Some("./config/locations.yaml"));
    assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    assert!(cfg.request_deadline_secs.is_none());
    assert_eq!(cfg.dmart.base_url, "https://digital.dmart.in");
    assert_eq!(cfg.dmart.timeout_secs, 20);
    assert_eq!(cfg.nine_minutes.base_url, "https://9minutes.in");
    assert_eq!(cfg.jiomart.mapping_base_url, "https://www.jiomart.com");
    assert_eq!(cfg.jiomart.index_name, "prod_mart_master_vertical");
    assert_eq!(cfg.jiomart.hits_per_page, 20);
    assert_eq!(cfg.jiomart.revision, IndexRevision::V3);
}

#[test]
fn request_timeout_is_default_for_every_backend() {
    let cfg = build_with(&[("PINCART_REQUEST_TIMEOUT_SECS", "7")]).unwrap();
    assert_eq!(cfg.dmart.timeout_secs, 7);
    assert_eq!(cfg.nine_minutes.timeout_secs, 7);
    assert_eq!(cfg.jiomart.timeout_secs, 7);
}

#[test]
fn per_backend_timeout_overrides_default() {
    let cfg = build_with(&[
        ("PINCART_REQUEST_TIMEOUT_SECS", "7"),
        ("PINCART_JIOMART_TIMEOUT_SECS", "3"),
    ])
    .unwrap();
    assert_eq!(cfg.jiomart.timeout_secs, 3);
    assert_eq!(cfg.dmart.timeout_secs, 7);
}

#[test]
fn zero_timeout_is_rejected() {
    assert_invalid(
        build_with(&[("PINCART_DMART_TIMEOUT_SECS", "0")]),
        "PINCART_DMART_TIMEOUT_SECS",
    );
}

#[test]
fn request_deadline_is_parsed_when_set() {
    let cfg = build_with(&[("PINCART_REQUEST_DEADLINE_SECS", "25")]).unwrap();
    assert_eq!(cfg.request_deadline_secs, Some(25));
}

#[test]
fn request_deadline_invalid() {
    assert_invalid(
        build_with(&[("PINCART_REQUEST_DEADLINE_SECS", "soon")]),
        "PINCART_REQUEST_DEADLINE_SECS",
    );
}

#[test]
fn invalid_bind_addr() {
    assert_invalid(
        build_with(&[("PINCART_BIND_ADDR", "not-a-socket-addr")]),
        "PINCART_BIND_ADDR",
    );
}

#[test]
fn base_url_trailing_slash_is_trimmed() {
    let cfg = build_with(&[("PINCART_DMART_BASE_URL", "http://127.0.0.1:8080/")]).unwrap();
    assert_eq!(cfg.dmart.base_url, "http://127.0.0.1:8080");
}

#[test]
fn base_url_without_scheme_is_rejected() {
    assert_invalid(
        build_with(&[("PINCART_NINE_MINUTES_BASE_URL", "9minutes.in")]),
        "PINCART_NINE_MINUTES_BASE_URL",
    );
}

#[test]
fn hits_per_page_out_of_range() {
    assert_invalid(
        build_with(&[("PINCART_JIOMART_HITS_PER_PAGE", "0")]),
        "PINCART_JIOMART_HITS_PER_PAGE",
    );
    assert_invalid(
        build_with(&[("PINCART_JIOMART_HITS_PER_PAGE", "500")]),
        "PINCART_JIOMART_HITS_PER_PAGE",
    );
}

#[test]
fn revision_override() {
    let cfg = build_with(&[("PINCART_JIOMART_REVISION", "v2")]).unwrap();
    assert_eq!(cfg.jiomart.revision, IndexRevision::V2);
}

#[test]
fn revision_unknown() {
    assert_invalid(
        build_with(&[("PINCART_JIOMART_REVISION", "latest")]),
        "PINCART_JIOMART_REVISION",
    );
}

#[test]
fn user_agent_override() {
    let cfg = build_with(&[("PINCART_USER_AGENT", "custom-agent/2.0")]).unwrap();
    assert_eq!(cfg.user_agent, "custom-agent/2.0");
}
