use crate::{
    base62::{ShortCode, encode},
    id::SnowflakeId,
};

/// Extension trait for rendering IDs as base-62 short codes.
pub trait Base62Ext {
    /// Encodes the ID as an 11-character base-62 [`ShortCode`].
    ///
    /// # Example
    /// ```
    /// use linkflake::{Base62Ext, SnowflakeId};
    ///
    /// let id = SnowflakeId::from_raw(62);
    /// assert_eq!(id.encode(), "00000000010");
    /// ```
    fn encode(&self) -> ShortCode;
}

impl Base62Ext for SnowflakeId {
    #[inline]
    fn encode(&self) -> ShortCode {
        encode(self.to_raw())
    }
}

impl From<SnowflakeId> for ShortCode {
    fn from(id: SnowflakeId) -> Self {
        encode(id.to_raw())
    }
}
