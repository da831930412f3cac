//! Query-string assembly with URL encoding.
//!
//! Resource endpoints build their query parameters through [`QueryString`],
//! which percent-encodes names and values and silently skips parameters
//! whose value is empty; an absent filter and an empty filter mean the same
//! thing to the service.

use core::fmt::Write;

use heapless::String;

use super::Error;

/// Maximum length of an assembled query string.
pub const MAX_QUERY_LEN: usize = 256;

/// An incrementally built, URL-encoded query string.
///
/// The first appended parameter brings the leading `?`, later ones are
/// joined with `&`. With no parameters [`as_str`](QueryString::as_str)
/// stays empty, so the result can be concatenated onto a path
/// unconditionally.
///
/// # Examples
///
/// ```rust
/// use smartcosmos::client::QueryString;
///
/// let mut query = QueryString::new();
/// query.append("view", "Standard").unwrap();
/// query.append("nameLike", "").unwrap(); // skipped
/// query.append("moniker", "a b").unwrap();
/// assert_eq!(query.as_str(), "?view=Standard&moniker=a%20b");
/// ```
#[derive(Debug, Default)]
pub struct QueryString {
    query: String<MAX_QUERY_LEN>,
}

impl QueryString {
    /// An empty query string.
    pub fn new() -> Self {
        Self {
            query: String::new(),
        }
    }

    /// Append one `name=value` pair, URL-encoding both sides.
    ///
    /// Pairs with an empty value are skipped. Fails with [`Error::Encode`]
    /// when the encoded pair does not fit [`MAX_QUERY_LEN`].
    pub fn append(&mut self, name: &str, value: &str) -> Result<(), Error> {
        if value.is_empty() {
            return Ok(());
        }
        let separator = if self.query.is_empty() { '?' } else { '&' };
        self.query.push(separator).map_err(|_| Error::Encode)?;
        percent_encode(&mut self.query, name)?;
        self.query.push('=').map_err(|_| Error::Encode)?;
        percent_encode(&mut self.query, value)?;
        Ok(())
    }

    /// The assembled query string, `?a=b&c=d` style, or `""` when nothing
    /// was appended.
    pub fn as_str(&self) -> &str {
        &self.query
    }
}

/// Percent-encode `value` onto `dst`, leaving RFC 3986 unreserved
/// characters as they are.
///
/// Also used on path segments that carry caller data, such as e-mail
/// addresses and realm names.
pub fn percent_encode<const N: usize>(dst: &mut String<N>, value: &str) -> Result<(), Error> {
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                dst.push(byte as char).map_err(|_| Error::Encode)?;
            }
            _ => {
                write!(dst, "%{:02X}", byte).map_err(|_| Error::Encode)?;
            }
        }
    }
    Ok(())
}
