use thiserror::Error;

/// Failures talking to the catalog service.
///
/// Payloads are rendered strings so the error stays `Clone`; callers that
/// fan a single failure out to several waiters rely on that.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The request did not complete within the client timeout.
    #[error("catalog request timed out: {0}")]
    Timeout(String),

    /// Transport-level failure (connect, TLS, reset...).
    #[error("catalog request failed: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("catalog request failed: {status} - {body}")]
    Status { status: u16, body: String },

    /// The body was not the shape we expected.
    #[error("failed to decode catalog response: {0}")]
    Decoding(String),

    #[error("invalid catalog url: {0}")]
    InvalidUrl(String),

    /// A paginated listing never produced a short page.
    #[error("listing did not end within {max_pages} pages")]
    PageLimitExceeded { max_pages: u32 },
}

impl CatalogError {
    /// Transport failures and timeouts, as opposed to answers we could not use.
    pub fn is_network(&self) -> bool {
        matches!(self, CatalogError::Timeout(_) | CatalogError::Network(_))
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CatalogError::Timeout(err.to_string())
        } else if err.is_decode() {
            CatalogError::Decoding(err.to_string())
        } else {
            CatalogError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Decoding(err.to_string())
    }
}

impl From<url::ParseError> for CatalogError {
    fn from(err: url::ParseError) -> Self {
        CatalogError::InvalidUrl(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
