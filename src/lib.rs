//! # smartcosmos - SMART COSMOS client SDK
//!
//! A Rust client SDK that lets any IoT device talk to the SMART COSMOS
//! object-management cloud: objects, files, tags, users and account
//! registration over REST. This library is designed for embedded systems
//! and supports `no_std` environments.
//!
//! ## Features
//!
//! ### Resource Endpoints
//! - **Objects**: create, update, look up and query the account's object records
//! - **Files**: define, upload (octet-stream or multipart), retrieve and delete
//! - **Users**: create, update, look up and change passwords
//! - **Registration**: realm availability checks and account registration
//! - **Tags**: batched tag metadata and verification
//!
//! ### Client Layer
//! - One blocking HTTP exchange per call over a caller-supplied transport
//! - HTTP Basic authentication with a SHA-512 hashed password, derived once
//!   and reused; the plaintext never leaves the configuration call
//! - Fixed-size buffers throughout, no allocator required
//!
//! ### Transport Abstraction
//! - Bring your own connection: plain TCP, TLS, anything that moves bytes
//! - One fresh connection per service call, closed when the response is in
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! smartcosmos = "0.1.0"
//! ```
//!
//! ### Creating an Object
//!
//! ```rust,no_run
//! use smartcosmos::endpoints::objects::NewObjectRequest;
//! use smartcosmos::factory::EndpointFactory;
//! # #[derive(Clone)]
//! # struct MockConnector;
//! # struct MockConnection;
//! # impl smartcosmos::network::Connection for MockConnection {}
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
//! # impl smartcosmos::network::Connect for MockConnector {
//! #     type Connection = MockConnection;
//! #     type Error = ();
//! #     fn connect(&mut self, _remote: &str) -> Result<Self::Connection, Self::Error> { Ok(MockConnection) }
//! # }
//!
//! let connector = MockConnector;
//! let mut factory = EndpointFactory::new(connector);
//! factory.set_user_account("Aladdin", "open sesame");
//!
//! let mut objects = factory.create_object_management_endpoint();
//!
//! let mut request = NewObjectRequest::default();
//! request.object_type = heapless::String::try_from("thermostat").unwrap();
//! request.name = heapless::String::try_from("Living room sensor").unwrap();
//!
//! // let (result, response) = objects.create(&request);
//! ```
//!
//! ### Checking a Realm Before Registering
//!
//! ```rust,no_run
//! use smartcosmos::factory::EndpointFactory;
//! # #[derive(Clone)]
//! # struct MockConnector;
//! # struct MockConnection;
//! # impl smartcosmos::network::Connection for MockConnection {}
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
//! # impl smartcosmos::network::Connect for MockConnector {
//! #     type Connection = MockConnection;
//! #     type Error = ();
//! #     fn connect(&mut self, _remote: &str) -> Result<Self::Connection, Self::Error> { Ok(MockConnection) }
//! # }
//!
//! let factory = EndpointFactory::new(MockConnector);
//! let mut registration = factory.create_registration_endpoint();
//!
//! // let (result, response) = registration.realm_availability("acme");
//! ```
//!
//! ## Platform Support
//!
//! This library is designed to work on:
//! - Embedded microcontrollers (ARM Cortex-M, RISC-V, etc.)
//! - Linux-based IoT devices (Raspberry Pi, etc.)
//! - Any platform supporting Rust's `core` library
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support (default: disabled)
//! - `defmt`: Enable defmt logging support for embedded debugging

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]
#![doc(html_root_url = "https://docs.rs/smartcosmos/0.1.0")]

/// Transport abstraction layer providing connection traits and the HTTP
/// client every service call runs on.
///
/// Platform code implements [`network::Connect`] once; everything else in
/// the crate is transport-agnostic.
pub mod network;

/// Shared client layer: configuration, the derived authorization token and
/// the per-call request executor.
pub mod client;

/// Shared value types: URNs, view types, entity references and roles.
pub mod types;

/// One client per service resource family: objects, files, users,
/// registration and tags.
pub mod endpoints;

/// Wires a connector and shared configuration into resource endpoints.
pub mod factory;
