//! # libiot-http - HTTP/1.1 client engine for IoT devices
//!
//! The HTTP side of libiot: a `no_std`, allocation-free request/response engine
//! that runs over any already-connected byte stream, whether a plain TCP socket
//! or a TLS session set up by the platform.
//!
//! ## Features
//!
//! - **Request building**: request line, `Host`, caller headers, and a body
//!   sent with `Content-Length` or chunked transfer-encoding
//! - **Chunked uploads**: bodies pulled piece by piece from a
//!   [`ChunkProducer`](http::ChunkProducer), so they never sit in RAM whole
//! - **Incremental response parsing**: status line, headers, and
//!   `Content-Length`, chunked or close-delimited bodies, fed in fragments of
//!   any size
//! - **Diagnostics**: raw request capture into a caller buffer
//! - **JSON**: `serde` bodies in both directions through `serde-json-core`
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! libiot-http = "0.1.0"
//! ```
//!
//! ### Basic GET
//!
//! ```rust,no_run
//! use libiot_http::http::{HttpRequest, Method};
//! # use libiot_http::network::{Read, Write};
//! # struct TcpSocket;
//! # impl Read for TcpSocket {
//! #     type Error = ();
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl Write for TcpSocket {
//! #     type Error = ();
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//!
//! let mut socket = TcpSocket;
//! let mut request = HttpRequest::new(&mut socket, Method::Get, "http://httpbin.org/status/418");
//!
//! if let Ok(response) = request.send() {
//!     let _ = (response.status_code(), response.status_message(), response.body_len());
//! }
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
//! - `defmt`: Log through defmt and implement `defmt::Format` for error types
//! - `log`: Log through the `log` facade

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]
#![doc(html_root_url = "https://shishir-dey.github.io/libiot/")]

#[macro_use]
mod fmt;

/// Transport traits and the protocols built on them.
///
/// The HTTP engine lives under [`network::application::http`], re-exported
/// at the crate root as [`http`].
pub mod network;

pub use network::application::http;
