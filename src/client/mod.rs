//! Shared client layer underneath every resource endpoint.
//!
//! All SMART COSMOS operations funnel through the same small machinery:
//! a [`Config`] carrying the transport settings, a derived Basic
//! authorization token, and a [`RestClient`] that performs one HTTP
//! exchange per call: serialize the payload to JSON, open a fresh
//! connection, send, read the response (an HTTP error status with a body
//! is still a response), deserialize the JSON body and stamp the observed
//! status code into it.
//!
//! Resource endpoints never expose these mechanics: they validate their
//! inputs, pick paths and verbs, and collapse whatever happens here into a
//! coarse per-resource action result.

#![deny(unsafe_code)]

use crate::network;

pub mod config;
pub mod executor;
pub mod query;

pub use config::{Config, DEFAULT_ACCEPT_LANGUAGE, DEFAULT_SERVER_URL, derive_token};
pub use executor::{RawBody, RestClient, decode_response};
pub use query::QueryString;

/// HTTP status codes that appear in the service's result contract.
pub mod status {
    /// Read or upload accepted.
    pub const OK: u16 = 200;
    /// Resource created.
    pub const CREATED: u16 = 201;
    /// Update or delete accepted, no body.
    pub const NO_CONTENT: u16 = 204;
    /// The service rejected the request data.
    pub const BAD_REQUEST: u16 = 400;
    /// Upload collided with existing content.
    pub const CONFLICT: u16 = 409;
}

/// Error type for the client layer.
///
/// Endpoints catch every variant at their boundary and report the coarse
/// per-resource action result instead; callers only ever see this type when
/// driving [`RestClient`] directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The configured server URL cannot be parsed into scheme, host and path.
    InvalidUrl,
    /// The connector failed to open a connection to the service.
    Connect,
    /// The exchange failed at the transport or HTTP layer.
    Transport(network::error::Error),
    /// Request assembly failed: JSON serialization or a buffer overflow.
    Encode,
    /// The response body could not be deserialized into the expected type.
    Decode,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::InvalidUrl => defmt::write!(f, "InvalidUrl"),
            Error::Connect => defmt::write!(f, "Connect"),
            Error::Transport(e) => defmt::write!(f, "Transport({})", e),
            Error::Encode => defmt::write!(f, "Encode"),
            Error::Decode => defmt::write!(f, "Decode"),
        }
    }
}

/// Optional headers attached to an exchange.
///
/// Each flag only takes effect when the corresponding configuration value
/// is non-empty: an endpoint may request `Authorization` while no user
/// account is set, and the header is simply omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestOptions {
    /// Attach the `Authorization` header carrying the derived Basic token.
    pub authorization: bool,
    /// Attach the configured `Accept-Language` header.
    pub accept_language: bool,
}

impl RequestOptions {
    /// No optional headers; used by pre-account operations.
    pub const NONE: Self = Self {
        authorization: false,
        accept_language: false,
    };
    /// Authorization only.
    pub const AUTHORIZATION: Self = Self {
        authorization: true,
        accept_language: false,
    };
    /// Authorization plus Accept-Language; the default for account-bound
    /// operations.
    pub const LOCALIZED: Self = Self {
        authorization: true,
        accept_language: true,
    };
}

/// Implemented by response payloads so the executor can record the HTTP
/// status code of the exchange that produced them.
pub trait StatusCarrier {
    /// Store the observed HTTP status code.
    fn set_status_code(&mut self, code: u16);
    /// The HTTP status code observed when this payload was received.
    fn status_code(&self) -> u16;
}

/// Implements [`StatusCarrier`] for response types with an
/// `http_status_code: u16` field.
macro_rules! impl_status_carrier {
    ($($response:ty),+ $(,)?) => {
        $(
            impl $crate::client::StatusCarrier for $response {
                fn set_status_code(&mut self, code: u16) {
                    self.http_status_code = code;
                }

                fn status_code(&self) -> u16 {
                    self.http_status_code
                }
            }
        )+
    };
}

pub(crate) use impl_status_carrier;
