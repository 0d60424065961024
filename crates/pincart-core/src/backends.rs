use serde::{Deserialize, Serialize};

/// One of the fixed set of product-search backends the aggregate reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendName {
    Instamart,
    Zepto,
    Blinkit,
    Dmart,
    Jiomart,
}

impl BackendName {
    /// Every backend, in the order keys appear in the aggregate response.
    pub const ALL: [BackendName; 5] = [
        BackendName::Instamart,
        BackendName::Zepto,
        BackendName::Blinkit,
        BackendName::Dmart,
        BackendName::Jiomart,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BackendName::Instamart => "instamart",
            BackendName::Zepto => "zepto",
            BackendName::Blinkit => "blinkit",
            BackendName::Dmart => "dmart",
            BackendName::Jiomart => "jiomart",
        }
    }

    /// Key under which this backend's products appear, e.g. `"dmart_products"`.
    ///
    /// The 9minutes proxy uses the same naming for its per-platform arrays.
    #[must_use]
    pub fn response_key(self) -> &'static str {
        match self {
            BackendName::Instamart => "instamart_products",
            BackendName::Zepto => "zepto_products",
            BackendName::Blinkit => "blinkit_products",
            BackendName::Dmart => "dmart_products",
            BackendName::Jiomart => "jiomart_products",
        }
    }
}

impl std::fmt::Display for BackendName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
