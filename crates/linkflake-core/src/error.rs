//! Error types for the mapping store and the issuance service.
//!
//! [`StoreError`] is what a [`MappingStore`](crate::MappingStore) reports;
//! uniqueness violations get their own variants so the issuance loop can tell
//! a short-code collision from a lost race on the same URL.
//!
//! [`Error`] is the service-level taxonomy:
//! - `InvalidUrl`: the request is rejected, never retried.
//! - `NotFound`: no mapping exists for the code.
//! - `IdGeneration`: a fatal generator condition (clock regression, timestamp
//!   overflow). Propagated to the caller, never retried internally.
//! - `Store`: the storage backend failed.
//! - `CollisionRetriesExhausted`: the optional collision cap was reached.

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Failures reported by a [`MappingStore`](crate::MappingStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A mapping with this short code already exists.
    #[error("short code already exists: {0}")]
    DuplicateCode(String),

    /// A mapping for this original URL already exists.
    #[error("original URL already mapped: {0}")]
    DuplicateUrl(String),

    /// The underlying database failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Unified error type for the shortening service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The submitted URL failed validation.
    #[error("Invalid URL: {reason}")]
    InvalidUrl { reason: String },

    /// No mapping exists for the requested short code.
    #[error("Short code not found: {code}")]
    NotFound { code: String },

    /// The ID generator refused to issue an ID.
    #[error("ID generation error: {0}")]
    IdGeneration(#[from] linkflake::Error),

    /// The mapping store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Every candidate short code collided, up to the configured cap.
    #[error("Gave up after {attempts} short code collisions")]
    CollisionRetriesExhausted { attempts: u32 },
}

impl Error {
    pub(crate) fn invalid_url(reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            reason: reason.into(),
        }
    }

    /// Returns `true` if the error was caused by the request rather than the
    /// service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidUrl { .. } | Self::NotFound { .. })
    }
}
