//! Error types for the ingest pipeline.
//!
//! Every failure is terminal for the creature being processed. Callers that
//! drive batches report the error and move on to the next id.

/// Errors that can occur while fetching, decoding or storing one creature.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The catalog request failed (connection, timeout or non-success status).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The payload could not be decoded into the expected shape.
    #[error("failed to decode {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    /// A decoded field held a value outside its documented domain.
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// A SQLite operation failed.
    #[error("SQLite error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// The static table declarations could not be ordered.
    #[error("schema error: {0}")]
    Schema(String),
}

impl IngestError {
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.into(),
            source,
        }
    }

    pub fn decode(what: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            what: what.into(),
            source,
        }
    }
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
