//! Error taxonomy for a single request/response exchange.

use core::fmt;

/// Why an exchange failed.
///
/// Every failure is terminal for the `send` call that produced it. The engine
/// never retries; the caller decides whether to reconnect and send again.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The transport could not be opened for the request URL.
    TransportOpenError,
    /// The transport rejected or stalled a write.
    TransportWriteError,
    /// The transport reported an error (including a timeout) while reading.
    TransportReadError,
    /// The peer closed the stream before the response was complete.
    UnexpectedEndOfStream,
    /// The status line is not `HTTP/<version> <code> <message>`.
    MalformedStatusLine,
    /// A header line is not `name: value`, or a framing header is invalid.
    MalformedHeaderLine,
    /// A chunk-size line or the CRLF after chunk data is invalid.
    MalformedChunkSize,
    /// The response does not fit the fixed-capacity buffers.
    ResponseTooLarge,
    /// The request URL could not be parsed.
    InvalidUrl,
    /// A request header is too long, contains CR/LF, or the header list is full.
    InvalidHeader,
    /// A JSON request body could not be serialized.
    Serialize,
    /// A JSON response body could not be deserialized.
    Deserialize,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::TransportOpenError => "failed to open transport",
            Error::TransportWriteError => "failed to write to transport",
            Error::TransportReadError => "failed to read from transport",
            Error::UnexpectedEndOfStream => "unexpected end of stream",
            Error::MalformedStatusLine => "malformed status line",
            Error::MalformedHeaderLine => "malformed header line",
            Error::MalformedChunkSize => "malformed chunk size",
            Error::ResponseTooLarge => "response too large",
            Error::InvalidUrl => "invalid url",
            Error::InvalidHeader => "invalid header",
            Error::Serialize => "json serialization failed",
            Error::Deserialize => "json deserialization failed",
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::TransportOpenError => defmt::write!(f, "TransportOpenError"),
            Error::TransportWriteError => defmt::write!(f, "TransportWriteError"),
            Error::TransportReadError => defmt::write!(f, "TransportReadError"),
            Error::UnexpectedEndOfStream => defmt::write!(f, "UnexpectedEndOfStream"),
            Error::MalformedStatusLine => defmt::write!(f, "MalformedStatusLine"),
            Error::MalformedHeaderLine => defmt::write!(f, "MalformedHeaderLine"),
            Error::MalformedChunkSize => defmt::write!(f, "MalformedChunkSize"),
            Error::ResponseTooLarge => defmt::write!(f, "ResponseTooLarge"),
            Error::InvalidUrl => defmt::write!(f, "InvalidUrl"),
            Error::InvalidHeader => defmt::write!(f, "InvalidHeader"),
            Error::Serialize => defmt::write!(f, "Serialize"),
            Error::Deserialize => defmt::write!(f, "Deserialize"),
        }
    }
}
