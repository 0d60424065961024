use std::net::SocketAddr;
use std::path::PathBuf;

/// Outbound settings for a backend reached over a single base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Field-mapping revision of the JioMart search-index adapter.
///
/// The index schema changed across adapter revisions; each revision selects
/// a different attribute table. See `pincart_scraper::jiomart::IndexFieldMap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexRevision {
    V1,
    V2,
    V3,
}

impl std::fmt::Display for IndexRevision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexRevision::V1 => write!(f, "v1"),
            IndexRevision::V2 => write!(f, "v2"),
            IndexRevision::V3 => write!(f, "v3"),
        }
    }
}

impl std::str::FromStr for IndexRevision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" => Ok(IndexRevision::V1),
            "v2" => Ok(IndexRevision::V2),
            "v3" => Ok(IndexRevision::V3),
            other => Err(format!("unknown index revision '{other}'; expected v1, v2 or v3")),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct JiomartSettings {
    /// Storefront host serving the pincode → inventory-code mapping.
    pub mapping_base_url: String,
    /// Search-index host (Algolia DSN).
    pub search_base_url: String,
    pub app_id: String,
    pub api_key: String,
    pub index_name: String,
    pub hits_per_page: u32,
    pub revision: IndexRevision,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for JiomartSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiomartSettings")
            .field("mapping_base_url", &self.mapping_base_url)
            .field("search_base_url", &self.search_base_url)
            .field("app_id", &self.app_id)
            .field("api_key", &"[redacted]")
            .field("index_name", &self.index_name)
            .field("hits_per_page", &self.hits_per_page)
            .field("revision", &self.revision)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub locations_path: PathBuf,
    /// Browser-like user agent sent to every backend.
    pub user_agent: String,
    /// Upper bound on a whole aggregate search. `None` waits for every
    /// backend's own timeout.
    pub request_deadline_secs: Option<u64>,
    pub dmart: BackendSettings,
    pub nine_minutes: BackendSettings,
    pub jiomart: JiomartSettings,
}
