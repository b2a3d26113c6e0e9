//! Parsed HTTP response.

use super::error::Error;
use super::header::{Header, HeaderList};
use super::{DEFAULT_BODY_CAPACITY, MAX_STATUS_MESSAGE_LEN};
use heapless::{String, Vec};
use serde::Deserialize;

/// A complete response.
///
/// Only produced when the whole response was parsed; a failed exchange never
/// exposes a partial one. `N` is the body buffer capacity in bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response<const N: usize = DEFAULT_BODY_CAPACITY> {
    status_code: u16,
    status_message: String<MAX_STATUS_MESSAGE_LEN>,
    headers: HeaderList,
    trailers: HeaderList,
    body: Vec<u8, N>,
    body_len: usize,
}

impl<const N: usize> Response<N> {
    pub(crate) fn new(
        status_code: u16,
        status_message: String<MAX_STATUS_MESSAGE_LEN>,
        headers: HeaderList,
        trailers: HeaderList,
        body: Vec<u8, N>,
        body_len: usize,
    ) -> Self {
        Self {
            status_code,
            status_message,
            headers,
            trailers,
            body,
            body_len,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Reason phrase from the status line, possibly empty.
    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// `true` for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Response headers in wire order.
    pub fn headers(&self) -> &HeaderList {
        &self.headers
    }

    pub fn headers_len(&self) -> usize {
        self.headers.len()
    }

    pub fn header_name(&self, ix: usize) -> Option<&str> {
        self.headers.at(ix).map(|h| h.name.as_str())
    }

    pub fn header_value(&self, ix: usize) -> Option<&str> {
        self.headers.at(ix).map(|h| h.value.as_str())
    }

    /// First header called `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Trailer fields sent after a chunked body. Never merged into
    /// [`Response::headers`].
    pub fn trailers(&self) -> &HeaderList {
        &self.trailers
    }

    /// Buffered body bytes. Empty when the body was streamed to a callback.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Decoded body length, including bytes streamed to a callback.
    pub fn body_len(&self) -> usize {
        self.body_len
    }

    pub fn body_as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.body).ok()
    }

    /// Deserialize the buffered body as JSON.
    pub fn json<'de, T: Deserialize<'de>>(&'de self) -> Result<T, Error> {
        serde_json_core::from_slice::<T>(&self.body)
            .map(|(value, _)| value)
            .map_err(|_| Error::Deserialize)
    }
}

impl<'a, const N: usize> IntoIterator for &'a Response<N> {
    type Item = &'a Header;
    type IntoIter = core::slice::Iter<'a, Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.headers.iter()
    }
}
