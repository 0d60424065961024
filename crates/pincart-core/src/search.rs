use thiserror::Error;

/// Rejections for an incoming search call. These are the only failures
/// that reach the HTTP caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing 'query' or 'pincode' parameter")]
    MissingParameter,

    #[error("Pincode must be 6 digits")]
    InvalidPincode,
}

/// A validated search: free-text query plus a 6-digit pincode.
///
/// Built once per incoming call and shared read-only by every backend task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    query: String,
    pincode: String,
}

impl SearchRequest {
    /// Validates raw query-string parameters.
    ///
    /// The query is trimmed; an all-whitespace query counts as missing.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::MissingParameter`] if either value is absent or empty.
    /// - [`ValidationError::InvalidPincode`] if the pincode is not exactly six ASCII digits.
    pub fn new(query: Option<&str>, pincode: Option<&str>) -> Result<Self, ValidationError> {
        let query = query.map(str::trim).filter(|q| !q.is_empty());
        let pincode = pincode.filter(|p| !p.is_empty());

        let (Some(query), Some(pincode)) = (query, pincode) else {
            return Err(ValidationError::MissingParameter);
        };

        if !is_valid_pincode(pincode) {
            return Err(ValidationError::InvalidPincode);
        }

        Ok(Self {
            query: query.to_owned(),
            pincode: pincode.to_owned(),
        })
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn pincode(&self) -> &str {
        &self.pincode
    }
}

/// `true` when `pincode` is exactly six ASCII digits.
#[must_use]
pub fn is_valid_pincode(pincode: &str) -> bool {
    pincode.len() == 6 && pincode.bytes().all(|b| b.is_ascii_digit())
}
