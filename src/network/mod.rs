//! A transport abstraction layer for the SDK.
//!
//! The SDK never opens sockets itself. Platform code supplies a connector
//! implementing [`Connect`]; every service call asks it for a fresh
//! [`Connection`] (plain TCP, TLS, or anything else that can move bytes),
//! performs one HTTP exchange over it, and closes it. This keeps the crate
//! free of OS and TLS dependencies and makes the whole stack testable with
//! in-memory connections.
//!
//! When the configured server URL uses `https`, the connector is expected
//! to establish TLS itself and to honor
//! [`Config::allow_invalid_certificates`](crate::client::Config::allow_invalid_certificates)
//! for its certificate checks.

#![allow(missing_docs)]
#![deny(unsafe_code)]

/// Common error types for transport operations
pub mod error;

/// Minimal HTTP/1.1 client used for every service exchange
pub mod http;

/// Re-exports of the transport traits
pub mod prelude {
    pub use super::{Close, Connect, Connection, Read, Write};
}

// Core synchronous traits
pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Read data from the connection
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the connection
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

pub trait Close {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Close the connection
    fn close(self) -> Result<(), Self::Error>;
}

/// A synchronous connection
pub trait Connection: Read + Write + Close {}

/// A synchronous connector (client)
///
/// `remote` is an `authority` string (`host:port`); implementations resolve
/// and dial it. One connection is requested per service call.
pub trait Connect {
    /// Associated connection type
    type Connection: Connection;
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Open a connection
    fn connect(&mut self, remote: &str) -> Result<Self::Connection, Self::Error>;
}
