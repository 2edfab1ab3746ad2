use chrono::{DateTime, SubsecRound, Utc};
use linkflake::ShortCode;
use serde::{Deserialize, Serialize};

/// Maximum accepted length of an original URL, in bytes.
pub const MAX_URL_LEN: usize = 2048;

/// A persisted association between an original URL and its short code.
///
/// Created once, on the first request for a given URL, and immutable
/// afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    /// Durable identifier assigned by the store.
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
}

/// A mapping that has not been stored yet.
///
/// The short code is a [`ShortCode`], so it can only come from the base-62
/// encoder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMapping {
    pub original_url: String,
    pub short_code: ShortCode,
    pub created_at: DateTime<Utc>,
}

impl NewMapping {
    /// Creates a mapping stamped with the current time, truncated to whole
    /// milliseconds so every store round-trips it exactly.
    pub fn new(original_url: impl Into<String>, short_code: ShortCode) -> Self {
        Self {
            original_url: original_url.into(),
            short_code,
            created_at: Utc::now().trunc_subsecs(3),
        }
    }

    /// Attaches the durable `id` assigned by a store.
    pub fn into_mapping(self, id: i64) -> Mapping {
        Mapping {
            id,
            original_url: self.original_url,
            short_code: self.short_code.into_string(),
            created_at: self.created_at,
        }
    }
}
