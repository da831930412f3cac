//! Per-client configuration and the derived Basic authorization token.
//!
//! [`Config`] holds everything an endpoint needs to reach the service: the
//! server URL, the `Accept-Language` value, connection keep-alive, a
//! certificate-checking hint for the platform connector, and the
//! authorization token derived from a user account. Endpoints clone the
//! configuration when they are created, so a factory-wide change never
//! surprises a client that is already in flight.

use core::fmt::Write;

use base64ct::{Base64, Encoding as B64Encoding};
use heapless::{String, Vec};
use sha2::{Digest, Sha512};

use super::Error;

/// Maximum length of the stored server URL.
pub const MAX_SERVER_URL_LEN: usize = 128;

/// Maximum length of the stored `Accept-Language` value.
pub const MAX_LANGUAGE_LEN: usize = 16;

/// Maximum length of the derived authorization token.
pub const MAX_TOKEN_LEN: usize = 384;

/// Maximum length of an authority (`host:port`) string.
pub const MAX_AUTHORITY_LEN: usize = 128;

/// Maximum user name length [`derive_token`] accepts; longer names do not
/// fit the token buffer and clear the token instead.
pub const MAX_USERNAME_LEN: usize = 127;

/// Server URL every configuration starts out with.
pub const DEFAULT_SERVER_URL: &str = "https://www.smart-cosmos.com/service/rest";

/// `Accept-Language` value every configuration starts out with.
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en";

/// Length of a SHA-512 digest rendered as lowercase hex.
const SHA512_HEX_LEN: usize = 128;

/// Capacity of the `user:digest` buffer fed to the base64 encoder.
const USERPASS_LEN: usize = MAX_USERNAME_LEN + 1 + SHA512_HEX_LEN;

/// Capacity of the base64 output buffer.
const BASE64_LEN: usize = (USERPASS_LEN + 2) / 3 * 4;

/// Derive the `Authorization` header value for a user account.
///
/// The service authenticates with HTTP Basic where the password is replaced
/// by its lowercase SHA-512 hex digest:
/// `Basic base64(username + ":" + hex(sha512(password)))`. The plaintext
/// password never leaves this function. An empty user name or password
/// yields the empty token, as does a user name longer than
/// [`MAX_USERNAME_LEN`]; requests made with an empty token simply omit the
/// `Authorization` header.
///
/// # Examples
///
/// ```rust
/// use smartcosmos::client::derive_token;
///
/// let token = derive_token("Aladdin", "open sesame");
/// assert!(token.starts_with("Basic QWxhZGRpbjo4NDcw"));
///
/// assert!(derive_token("", "open sesame").is_empty());
/// ```
pub fn derive_token(username: &str, password: &str) -> String<MAX_TOKEN_LEN> {
    if username.is_empty() || password.is_empty() {
        return String::new();
    }

    let digest = Sha512::digest(password.as_bytes());
    let mut hex_digest = [0u8; SHA512_HEX_LEN];
    if hex::encode_to_slice(digest, &mut hex_digest).is_err() {
        return String::new();
    }

    let mut userpass: Vec<u8, USERPASS_LEN> = Vec::new();
    if userpass.extend_from_slice(username.as_bytes()).is_err()
        || userpass.push(b':').is_err()
        || userpass.extend_from_slice(&hex_digest).is_err()
    {
        return String::new();
    }

    let mut encoded = [0u8; BASE64_LEN];
    let encoded = match Base64::encode(&userpass, &mut encoded) {
        Ok(encoded) => encoded,
        Err(_) => return String::new(),
    };

    let mut token = String::new();
    if token.push_str("Basic ").is_err() || token.push_str(encoded).is_err() {
        return String::new();
    }
    token
}

/// Transport settings shared by every endpoint built from one factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    server_url: String<MAX_SERVER_URL_LEN>,
    accept_language: String<MAX_LANGUAGE_LEN>,
    authorization_token: String<MAX_TOKEN_LEN>,
    /// Ask the server to keep the TCP connection open after the exchange.
    ///
    /// Only advisory: every operation still opens its own connection and
    /// closes it when the response has been read.
    pub keep_alive: bool,
    /// Let the platform connector accept TLS certificates it cannot verify.
    ///
    /// The SDK itself never terminates TLS; connectors implementing
    /// [`Connect`](crate::network::Connect) are expected to consult this
    /// flag when they open an `https` connection. The effect is scoped to
    /// clients built from this configuration.
    pub allow_invalid_certificates: bool,
}

impl Config {
    /// A configuration pointing at the hosted service: `en` responses,
    /// keep-alive on, strict certificate checks and no user account.
    pub fn new() -> Self {
        Self {
            server_url: String::try_from(DEFAULT_SERVER_URL).unwrap_or_default(),
            accept_language: String::try_from(DEFAULT_ACCEPT_LANGUAGE).unwrap_or_default(),
            authorization_token: String::new(),
            keep_alive: true,
            allow_invalid_certificates: false,
        }
    }

    /// The configured server URL. Never ends with `/`.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Replace the server URL, stripping any trailing slashes so the base
    /// path concatenates cleanly with endpoint sub-paths.
    ///
    /// Fails with [`Error::InvalidUrl`] when the trimmed value does not fit
    /// [`MAX_SERVER_URL_LEN`]; the previous URL is kept in that case.
    pub fn set_server_url(&mut self, url: &str) -> Result<(), Error> {
        let trimmed = url.trim_end_matches('/');
        self.server_url = String::try_from(trimmed).map_err(|_| Error::InvalidUrl)?;
        Ok(())
    }

    /// The `Accept-Language` value attached to language-sensitive calls.
    pub fn accept_language(&self) -> &str {
        &self.accept_language
    }

    /// Replace the `Accept-Language` value. Values that do not fit clear
    /// it, which omits the header from subsequent calls.
    pub fn set_accept_language(&mut self, language: &str) {
        self.accept_language = String::try_from(language).unwrap_or_default();
    }

    /// The derived authorization token; empty when no account is set.
    pub fn authorization_token(&self) -> &str {
        &self.authorization_token
    }

    /// Derive and store the token for a user account via [`derive_token`].
    ///
    /// An empty user name or password clears the token.
    pub fn set_user_account(&mut self, username: &str, password: &str) {
        self.authorization_token = derive_token(username, password);
    }

    /// Drop the stored token; subsequent calls go out unauthenticated.
    pub fn clear_user_account(&mut self) {
        self.authorization_token = String::new();
    }

    /// Split the stored URL into scheme, authority and base path.
    pub fn parsed_url(&self) -> Result<ParsedUrl<'_>, Error> {
        ParsedUrl::parse(&self.server_url)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// The components of a configured server URL, borrowed from the [`Config`].
///
/// Parsed on demand when a request is assembled, so the stored value stays
/// exactly what the caller provided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedUrl<'a> {
    /// Whether the scheme was `https`.
    pub tls: bool,
    /// Host name, without the port.
    pub host: &'a str,
    /// Port, explicit or the scheme default (443 or 80).
    pub port: u16,
    /// Whether the URL spelled the port out.
    pub explicit_port: bool,
    /// Path prefix in front of every endpoint sub-path. May be empty,
    /// never ends with `/`.
    pub base_path: &'a str,
}

impl<'a> ParsedUrl<'a> {
    fn parse(url: &'a str) -> Result<Self, Error> {
        let (tls, rest) = if let Some(rest) = url.strip_prefix("https://") {
            (true, rest)
        } else if let Some(rest) = url.strip_prefix("http://") {
            (false, rest)
        } else {
            return Err(Error::InvalidUrl);
        };

        let (authority, base_path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, ""),
        };

        let (host, port, explicit_port) = match authority.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| Error::InvalidUrl)?;
                (host, port, true)
            }
            None => (authority, if tls { 443 } else { 80 }, false),
        };

        if host.is_empty() {
            return Err(Error::InvalidUrl);
        }

        Ok(Self {
            tls,
            host,
            port,
            explicit_port,
            base_path,
        })
    }

    /// The `host:port` string handed to the connector.
    pub fn authority(&self) -> Result<String<MAX_AUTHORITY_LEN>, Error> {
        let mut authority = String::new();
        write!(authority, "{}:{}", self.host, self.port).map_err(|_| Error::InvalidUrl)?;
        Ok(authority)
    }

    /// The `Host` header value: the authority as the URL spelled it, with
    /// the port only when it was explicit.
    pub fn host_header(&self) -> Result<String<MAX_AUTHORITY_LEN>, Error> {
        let mut value = String::new();
        if self.explicit_port {
            write!(value, "{}:{}", self.host, self.port).map_err(|_| Error::InvalidUrl)?;
        } else {
            value.push_str(self.host).map_err(|_| Error::InvalidUrl)?;
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALADDIN_TOKEN: &str = "Basic QWxhZGRpbjo4NDcwY2RkM2JmMWVmODVkNWYwOTJiY2U1YWU1YWY5N2NlNTA4\
        MjA0ODFiZjQzYjI0MTM4MDdmZWMzN2UyNzg1YjUzM2E2NWQ0YzdkNzE2OTViMTQxZDgxZWJjZDRiNmM0ZGVmNDI4\
        NGU2MDY3ZjBiOWRkYzMxOGIxYjIzMDIwNQ==";

    #[test]
    fn token_matches_the_documented_vector() {
        let token = derive_token("Aladdin", "open sesame");
        assert_eq!(token.as_str(), ALADDIN_TOKEN);
    }

    #[test]
    fn token_is_deterministic() {
        assert_eq!(
            derive_token("user@example.com", "hunter2"),
            derive_token("user@example.com", "hunter2")
        );
    }

    #[test]
    fn empty_credentials_yield_an_empty_token() {
        assert!(derive_token("", "open sesame").is_empty());
        assert!(derive_token("Aladdin", "").is_empty());
        assert!(derive_token("", "").is_empty());
    }

    #[test]
    fn oversized_username_yields_an_empty_token() {
        let mut name: String<200> = String::new();
        while name.len() <= MAX_USERNAME_LEN {
            name.push('a').unwrap();
        }
        assert!(derive_token(&name, "open sesame").is_empty());
    }

    #[test]
    fn config_stores_and_clears_the_account_token() {
        let mut config = Config::new();
        assert!(config.authorization_token().is_empty());

        config.set_user_account("Aladdin", "open sesame");
        assert_eq!(config.authorization_token(), ALADDIN_TOKEN);

        config.clear_user_account();
        assert!(config.authorization_token().is_empty());
    }

    #[test]
    fn server_url_drops_trailing_slashes() {
        let mut config = Config::new();
        config.set_server_url("https://example.com/rest/").unwrap();
        assert_eq!(config.server_url(), "https://example.com/rest");

        config.set_server_url("https://example.com/rest///").unwrap();
        assert_eq!(config.server_url(), "https://example.com/rest");

        // Re-applying the stored value is a no-op.
        let stored: String<MAX_SERVER_URL_LEN> = String::try_from(config.server_url()).unwrap();
        config.set_server_url(&stored).unwrap();
        assert_eq!(config.server_url(), "https://example.com/rest");
    }

    #[test]
    fn overlong_server_url_is_rejected() {
        let mut config = Config::new();
        let mut url: String<200> = String::try_from("https://example.com/").unwrap();
        while url.len() <= MAX_SERVER_URL_LEN {
            url.push('a').unwrap();
        }
        assert_eq!(config.set_server_url(&url), Err(Error::InvalidUrl));
        assert_eq!(config.server_url(), DEFAULT_SERVER_URL);
    }

    #[test]
    fn default_url_parses_into_tls_host_and_base_path() {
        let config = Config::new();
        let parsed = config.parsed_url().unwrap();
        assert!(parsed.tls);
        assert_eq!(parsed.host, "www.smart-cosmos.com");
        assert_eq!(parsed.port, 443);
        assert!(!parsed.explicit_port);
        assert_eq!(parsed.base_path, "/service/rest");
        assert_eq!(parsed.authority().unwrap().as_str(), "www.smart-cosmos.com:443");
        assert_eq!(parsed.host_header().unwrap().as_str(), "www.smart-cosmos.com");
    }

    #[test]
    fn explicit_port_is_kept_in_the_host_header() {
        let mut config = Config::new();
        config.set_server_url("http://10.0.0.5:8080/api").unwrap();
        let parsed = config.parsed_url().unwrap();
        assert!(!parsed.tls);
        assert_eq!(parsed.host, "10.0.0.5");
        assert_eq!(parsed.port, 8080);
        assert!(parsed.explicit_port);
        assert_eq!(parsed.base_path, "/api");
        assert_eq!(parsed.host_header().unwrap().as_str(), "10.0.0.5:8080");
    }

    #[test]
    fn bare_host_has_an_empty_base_path() {
        let mut config = Config::new();
        config.set_server_url("http://example.com").unwrap();
        let parsed = config.parsed_url().unwrap();
        assert_eq!(parsed.port, 80);
        assert_eq!(parsed.base_path, "");
    }

    #[test]
    fn unsupported_scheme_and_bad_port_are_invalid() {
        let mut config = Config::new();
        config.set_server_url("ftp://example.com/rest").unwrap();
        assert_eq!(config.parsed_url().unwrap_err(), Error::InvalidUrl);

        config.set_server_url("https://example.com:notaport/rest").unwrap();
        assert_eq!(config.parsed_url().unwrap_err(), Error::InvalidUrl);

        config.set_server_url("https:///rest").unwrap();
        assert_eq!(config.parsed_url().unwrap_err(), Error::InvalidUrl);
    }
}
