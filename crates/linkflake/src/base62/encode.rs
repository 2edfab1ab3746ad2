use crate::base62::ShortCode;

/// The base-62 alphabet in ascending ASCII order: digits, then upper-case,
/// then lower-case letters.
pub const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Fixed width of every encoded value. `62^11 > 2^64`, so the whole `u64`
/// domain fits.
pub const SHORT_CODE_LEN: usize = 11;

const BASE: u64 = ALPHABET.len() as u64;

/// Encodes `value` into `buf` as fixed-width base-62, most significant digit
/// first, left-padded with `'0'`.
///
/// Because the alphabet is in ASCII order and the width is fixed, the
/// byte-wise order of two outputs matches the numeric order of their inputs.
///
/// # Example
///
/// ```
/// use linkflake::{encode_to_buf, SHORT_CODE_LEN};
///
/// let mut buf = [0_u8; SHORT_CODE_LEN];
/// encode_to_buf(62, &mut buf);
/// assert_eq!(&buf, b"00000000010");
/// ```
#[inline]
pub fn encode_to_buf(value: u64, buf: &mut [u8; SHORT_CODE_LEN]) {
    let mut n = value;
    for slot in buf.iter_mut().rev() {
        *slot = ALPHABET[(n % BASE) as usize];
        n /= BASE;
    }
    debug_assert_eq!(n, 0, "value does not fit {SHORT_CODE_LEN} base-62 digits");
}

/// Encodes `value` into a [`ShortCode`].
///
/// The mapping is injective over the whole `u64` domain. There is no decoder.
///
/// # Example
///
/// ```
/// use linkflake::encode;
///
/// assert_eq!(encode(0), "00000000000");
/// assert_eq!(encode(u64::MAX), "LygHa16AHYF");
/// ```
#[must_use]
pub fn encode(value: u64) -> ShortCode {
    let mut buf = [0_u8; SHORT_CODE_LEN];
    encode_to_buf(value, &mut buf);
    ShortCode::from_encoded(buf)
}
