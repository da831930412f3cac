//! HTTP/1.1 protocol implementation for embedded systems.
//!
//! This module provides the lightweight HTTP client every SDK call runs on.
//! It is designed for `no_std` environments: fixed-size buffers, predictable
//! memory usage, one synchronous request/response exchange per connection.
//!
//! # Features
//!
//! - GET, POST, PUT and DELETE methods
//! - Custom request headers, `Content-Length` handling on both sides
//! - Response status line and header parsing with case-insensitive lookup
//! - Body continuation reads until `Content-Length` bytes have arrived
//!
//! # Usage
//!
//! The main entry point is [`Client`], which works with any connection type
//! implementing the [`crate::network::Connection`] trait.
//!
//! ```rust,no_run
//! use smartcosmos::network::http::{Client, Method, Request};
//! # use smartcosmos::network::Connection;
//! # struct MockConnection;
//! # impl Connection for MockConnection {}
//! # impl smartcosmos::network::Read for MockConnection {
//! #     type Error = ();
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl smartcosmos::network::Write for MockConnection {
//! #     type Error = ();
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl smartcosmos::network::Close for MockConnection {
//! #     type Error = ();
//! #     fn close(self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//!
//! let connection = MockConnection;
//! let mut client = Client::new(connection);
//!
//! let request = Request {
//!     method: Method::Get,
//!     path: "/service/rest/objects",
//!     headers: heapless::Vec::new(),
//!     body: None,
//! };
//!
//! // let response = client.request(&request)?;
//! ```

/// HTTP client implementation and supporting types.
///
/// Contains the main [`Client`] struct and all related types for making
/// HTTP requests and handling responses.
pub mod client;

pub use client::{Client, Header, Method, Request, Response};

/// Maximum number of headers on a request or response.
pub const MAX_HEADERS: usize = 16;
/// Maximum length of a header name.
pub const MAX_HEADER_NAME_LEN: usize = 64;
/// Maximum length of a header value.
///
/// Sized to hold a full `Authorization: Basic …` value, which carries a
/// base64-encoded username plus SHA-512 hex digest.
pub const MAX_HEADER_VALUE_LEN: usize = 384;
/// Maximum response body size in bytes. Larger bodies fail the exchange
/// with [`Error::ProtocolError`](crate::network::error::Error::ProtocolError).
pub const MAX_BODY_LEN: usize = 4096;
