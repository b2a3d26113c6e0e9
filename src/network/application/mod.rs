//! # Application Layer Protocols
//!
//! Application layer (OSI Layer 7) protocols built on the transport traits in
//! [`crate::network`].
//!
//! All protocol implementations in this module follow these principles:
//!
//! - **Connection Agnostic**: Work with any type implementing
//!   [`Read`](crate::network::Read) and [`Write`](crate::network::Write)
//! - **No-std Compatible**: Designed for embedded systems without heap allocation
//! - **Resource Conscious**: Use fixed-size buffers and minimal memory
//! - **Error Handling**: Every failure is reported, never retried behind the
//!   caller's back

/// HTTP/1.1 request/response engine.
///
/// Provides request building with fixed or chunked bodies and an incremental
/// response parser, suitable for embedded systems.
pub mod http;
