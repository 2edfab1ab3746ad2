use core::{fmt, ops::Deref};

use crate::base62::SHORT_CODE_LEN;

/// A fixed-width, 11-character base-62 code.
///
/// Values are only produced by [`encode`](crate::base62::encode), so every
/// byte is guaranteed to come from [`ALPHABET`](crate::base62::ALPHABET).
/// Ordering is byte-wise and therefore agrees with the numeric order of the
/// encoded values.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShortCode {
    buf: [u8; SHORT_CODE_LEN],
}

impl ShortCode {
    pub(crate) const fn from_encoded(buf: [u8; SHORT_CODE_LEN]) -> Self {
        Self { buf }
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // SAFETY: `buf` is only ever filled from the ASCII alphabet.
        unsafe { core::str::from_utf8_unchecked(&self.buf) }
    }

    /// Returns the raw ASCII bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SHORT_CODE_LEN] {
        &self.buf
    }

    /// Copies the code into an owned [`String`].
    #[must_use]
    pub fn into_string(self) -> String {
        self.as_str().to_owned()
    }
}

impl Deref for ShortCode {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ShortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for ShortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ShortCode").field(&self.as_str()).finish()
    }
}

impl PartialEq<str> for ShortCode {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for ShortCode {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialEq<String> for ShortCode {
    fn eq(&self, other: &String) -> bool {
        self.as_str() == other.as_str()
    }
}

impl From<ShortCode> for String {
    fn from(code: ShortCode) -> Self {
        code.into_string()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ShortCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use crate::base62::encode;

    #[test]
    fn views_agree() {
        let code = encode(3_843);
        assert_eq!(code.as_str(), "000000000zz");
        assert_eq!(code.as_bytes(), b"000000000zz");
        assert_eq!(code.to_string(), "000000000zz");
        assert_eq!(String::from(code), "000000000zz");
        assert_eq!(format!("{code:?}"), r#"ShortCode("000000000zz")"#);
    }

    #[test]
    fn ord_follows_value() {
        assert!(encode(61) < encode(62));
        assert!(encode(u64::MAX - 1) < encode(u64::MAX));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&encode(62)).unwrap();
        assert_eq!(json, r#""00000000010""#);
    }
}
