//! HTTP/1.1 request/response engine for embedded systems.
//!
//! This module drives one request/response exchange over any transport
//! implementing [`Read`](crate::network::Read) and
//! [`Write`](crate::network::Write). The transport may be a plain TCP socket
//! or a TLS session; the engine does not care and never touches TLS.
//!
//! # Features
//!
//! - Fixed-size buffers for predictable memory usage
//! - Request bodies from a buffer, a JSON value, or a pull-based
//!   [`ChunkProducer`](chunked::ChunkProducer) sent with chunked encoding
//! - Incremental response parsing, whatever size fragments the transport
//!   delivers
//! - `Content-Length`, chunked and close-delimited response bodies
//! - Optional streaming of the response body to a callback
//! - Optional capture of the raw request bytes for diagnostics
//! - Several requests over one socket, with [`KeepAlive`] holding bytes read
//!   ahead of the next response
//!
//! # Usage
//!
//! ```rust,no_run
//! use libiot_http::http::{HttpRequest, Method};
//! # use libiot_http::network::{Read, Write};
//! # struct Socket;
//! # impl Read for Socket {
//! #     type Error = ();
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl Write for Socket {
//! #     type Error = ();
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//!
//! let mut socket = Socket;
//! let mut request: HttpRequest<'_, _> =
//!     HttpRequest::new(&mut socket, Method::Post, "http://httpbin.org/post");
//! request.set_header("Content-Type", "application/json").unwrap();
//!
//! match request.send_body(br#"{"hello":"world"}"#) {
//!     Ok(response) => {
//!         let _status = response.status_code();
//!     }
//!     Err(e) => {
//!         let _ = e;
//!     }
//! }
//! ```

/// Request serialization and raw request logging.
pub mod builder;

/// Pull-based chunk producers for chunked request bodies.
pub mod chunked;

/// The per-request facade tying builder and parser together.
pub mod client;

mod error;

/// Header storage.
pub mod header;

/// Read-ahead buffering for sockets reused across requests.
pub mod keep_alive;

/// Incremental response parser.
pub mod parser;

/// Parsed response.
pub mod response;

/// URL parsing.
pub mod url;

pub use builder::{Body, Method, RequestBuilder, RequestLog};
pub use chunked::{Chunk, ChunkProducer};
pub use client::{HttpRequest, open};
pub use error::Error;
pub use header::{Header, HeaderList};
pub use keep_alive::KeepAlive;
pub use parser::{BodyKind, BodySink, Progress, ResponseParser};
pub use response::Response;
pub use url::{Scheme, Url};

/// Maximum number of headers kept per request or response (trailers count
/// separately).
pub const MAX_HEADERS: usize = 16;
/// Maximum header name length in bytes.
pub const MAX_HEADER_NAME_LEN: usize = 64;
/// Maximum header value length in bytes.
pub const MAX_HEADER_VALUE_LEN: usize = 256;
/// Longest reason phrase kept; longer ones are truncated.
pub const MAX_STATUS_MESSAGE_LEN: usize = 64;
/// Longest status, header, chunk-size or trailer line accepted.
pub const MAX_LINE_LEN: usize = 512;
/// Default response body capacity.
pub const DEFAULT_BODY_CAPACITY: usize = 2048;
/// Stack buffer used for each transport read.
pub const RECEIVE_BUFFER_LEN: usize = 256;
/// Staging buffer that coalesces small request writes.
pub const WRITE_BUFFER_LEN: usize = 256;
/// Largest JSON request body `send_json` will serialize.
pub const MAX_JSON_BODY_LEN: usize = 1024;
