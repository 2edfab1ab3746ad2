use http::Uri;

use crate::{Error, MAX_URL_LEN, Result};

/// Validates a URL submitted for shortening and returns its trimmed form.
///
/// The URL must parse as an absolute URI with both a scheme and a host, and
/// the scheme must be `http` or `https` (case-insensitive). Only ASCII RFC 3986
/// characters and well-formed percent-escapes are allowed. No other
/// normalization is applied.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] describing the first violated rule.
///
/// # Example
///
/// ```
/// use linkflake_core::validate_url;
///
/// assert_eq!(validate_url("  https://example.com  ").unwrap(), "https://example.com");
/// assert!(validate_url("ftp://example.com").is_err());
/// ```
pub fn validate_url(url: &str) -> Result<&str> {
    let url = url.trim();
    if url.is_empty() {
        return Err(Error::invalid_url("URL cannot be empty"));
    }
    if url.len() > MAX_URL_LEN {
        return Err(Error::invalid_url(format!(
            "URL exceeds {MAX_URL_LEN} bytes"
        )));
    }

    let uri: Uri = url
        .parse()
        .map_err(|e: http::uri::InvalidUri| Error::invalid_url(format!("malformed URL: {e}")))?;
    check_characters(url)?;

    let (Some(scheme), Some(_)) = (uri.scheme_str(), uri.host().filter(|h| !h.is_empty())) else {
        return Err(Error::invalid_url("scheme and host are required"));
    };

    if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
        return Err(Error::invalid_url("only http and https are supported"));
    }

    Ok(url)
}

/// RFC 3986 unreserved and reserved characters.
const fn is_uri_char(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'-' | b'.' | b'_' | b'~'
                | b':' | b'/' | b'?' | b'#' | b'[' | b']' | b'@'
                | b'!' | b'$' | b'&' | b'\'' | b'(' | b')'
                | b'*' | b'+' | b',' | b';' | b'='
        )
}

/// Rejects bytes `Uri` tolerates but RFC 3986 does not: non-ASCII, characters
/// outside the URI set, and `%` not followed by two hex digits.
fn check_characters(url: &str) -> Result<()> {
    let bytes = url.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
                return Err(Error::invalid_url(format!(
                    "malformed URL: invalid percent-escape at index {i}"
                )));
            }
            i += 3;
            continue;
        }
        if !b.is_ascii() {
            return Err(Error::invalid_url(format!(
                "malformed URL: non-ASCII character at index {i}"
            )));
        }
        if !is_uri_char(b) {
            return Err(Error::invalid_url(format!(
                "malformed URL: illegal character {:?} at index {i}",
                char::from(b)
            )));
        }
        i += 1;
    }
    Ok(())
}
