//! Error types for a single collection pass.

use thiserror::Error;

/// Result type alias using [`CollectError`].
pub type Result<T> = std::result::Result<T, CollectError>;

/// Errors that abort one collector's pass for the current scrape.
///
/// Field-level anomalies (empty lists, placeholders, unparseable numbers) are
/// not represented here; they are coerced to zero by the translators.
#[derive(Debug, Error)]
pub enum CollectError {
    /// Transport failure, timeout, or non-success HTTP status.
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response body is not JSON of the expected shape.
    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CollectError {
    /// Create a fetch error for the given URL.
    pub fn fetch(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Fetch {
            url: url.into(),
            source,
        }
    }

    /// Create a decode error for the given URL.
    pub fn decode(url: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            url: url.into(),
            source,
        }
    }

    /// Whether the upstream request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Fetch { source, .. } if source.is_timeout())
    }
}
