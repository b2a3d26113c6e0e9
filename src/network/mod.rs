//! Transport abstraction layer.
//!
//! The HTTP engine never opens sockets or performs TLS itself. It talks to an
//! already-connected byte stream through the traits in this module, so the same
//! code runs over a plain TCP socket, a TLS session, or an in-memory mock.
//!

#![allow(missing_docs)]
#![deny(unsafe_code)]

/// Common error types for transport operations
pub mod error;

/// Application protocols built on top of the transport traits
pub mod application;

/// Re-exports of common traits
pub mod prelude {
    pub use super::{Close, Connect, Connection, Read, Write};
}

/// Receive side of a byte stream.
///
/// `Ok(0)` means the peer closed the stream. Transports that time out should
/// report it as an error so a waiting parser fails instead of spinning.
pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Read data from the connection
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Hand back bytes that were read but belong to the next message, so the
    /// next `read` returns them first. Returns how many were kept; the
    /// default keeps none.
    fn unread(&mut self, _data: &[u8]) -> usize {
        0
    }
}

/// Send side of a byte stream.
pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the connection, returning how many bytes were accepted
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

/// A synchronous connection, plain or encrypted.
pub trait Connection: Read + Write + Close {}

/// A synchronous connector (client)
pub trait Connect {
    /// Associated connection type
    type Connection: Connection;
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Open a connection to `remote`, given as `host:port`
    fn connect(&mut self, remote: &str) -> Result<Self::Connection, Self::Error>;
}
