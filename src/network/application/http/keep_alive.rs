use super::RECEIVE_BUFFER_LEN;
use crate::network::{Close, Connection, Read, Write};
use heapless::Vec;

/// A transport that keeps bytes read past the end of a response.
///
/// [`HttpRequest`](super::HttpRequest) reads in blocks of
/// [`RECEIVE_BUFFER_LEN`] bytes, so the last read of an exchange can pick up
/// the start of whatever the peer sent next. A bare transport loses those
/// bytes. Wrapped in `KeepAlive`, up to `N` of them are held back and served
/// first to the next request on the same socket.
///
/// # Examples
///
/// ```rust
/// use libiot_http::http::{HttpRequest, KeepAlive, Method};
/// # use libiot_http::network::{Read, Write};
/// # struct Socket(&'static [u8]);
/// # impl Read for Socket {
/// #     type Error = ();
/// #     fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
/// #         let n = self.0.len().min(buf.len());
/// #         buf[..n].copy_from_slice(&self.0[..n]);
/// #         self.0 = &self.0[n..];
/// #         Ok(n)
/// #     }
/// # }
/// # impl Write for Socket {
/// #     type Error = ();
/// #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
/// #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
/// # }
///
/// // Both responses arrive in a single read.
/// let mut conn = KeepAlive::new(Socket(
///     b"HTTP/1.1 200 OK\r\nContent-Length: 1\r\n\r\naHTTP/1.1 200 OK\r\nContent-Length: 1\r\n\r\nb",
/// ));
///
/// let mut first = HttpRequest::new(&mut conn, Method::Get, "http://h/a");
/// assert_eq!(first.send().unwrap().body(), b"a");
/// drop(first);
///
/// let mut second = HttpRequest::new(&mut conn, Method::Get, "http://h/b");
/// assert_eq!(second.send().unwrap().body(), b"b");
/// ```
#[derive(Debug)]
pub struct KeepAlive<C, const N: usize = RECEIVE_BUFFER_LEN> {
    inner: C,
    pending: Vec<u8, N>,
}

impl<C> KeepAlive<C> {
    pub fn new(inner: C) -> Self {
        Self::with_capacity(inner)
    }
}

impl<C, const N: usize> KeepAlive<C, N> {
    /// Wrap `inner`, holding back at most `N` bytes between reads.
    pub fn with_capacity(inner: C) -> Self {
        Self {
            inner,
            pending: Vec::new(),
        }
    }

    /// Bytes held back for the next read.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    pub fn get_ref(&self) -> &C {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut C {
        &mut self.inner
    }

    /// Unwrap the transport. Held-back bytes are discarded.
    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: Read, const N: usize> Read for KeepAlive<C, N> {
    type Error = C::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.pending.is_empty() {
            return self.inner.read(buf);
        }
        let n = self.pending.len().min(buf.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.rotate_left(n);
        self.pending.truncate(self.pending.len() - n);
        Ok(n)
    }

    /// Keeps all of `data` or, if it does not fit, none of it.
    fn unread(&mut self, data: &[u8]) -> usize {
        if self.pending.extend_from_slice(data).is_err() {
            return 0;
        }
        // Returned bytes were read before anything still pending.
        self.pending.rotate_right(data.len());
        data.len()
    }
}

impl<C: Write, const N: usize> Write for KeepAlive<C, N> {
    type Error = C::Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush()
    }
}

impl<C: Close, const N: usize> Close for KeepAlive<C, N> {
    type Error = C::Error;

    fn close(self) -> Result<(), Self::Error> {
        self.inner.close()
    }
}

impl<C: Connection, const N: usize> Connection for KeepAlive<C, N> {}
