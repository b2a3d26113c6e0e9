//! Request serialization.
//!
//! [`RequestBuilder`] writes the request line, headers and body straight to the
//! transport through a small staging buffer, so the head is sent in a few
//! large writes instead of one write per header. Every byte the transport
//! accepts is mirrored into an optional [`RequestLog`].

use super::WRITE_BUFFER_LEN;
use super::chunked::{Chunk, ChunkProducer};
use super::error::Error;
use super::header::HeaderList;
use super::url::Url;
use crate::network::Write;
use core::fmt;
use heapless::Vec;

/// Request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Patch,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Patch => "PATCH",
            Method::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Method {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str())
    }
}

/// Where the request body comes from.
pub enum Body<'b> {
    /// No body and no framing header.
    Empty,
    /// A buffer sent with `Content-Length`.
    Fixed(&'b [u8]),
    /// A producer sent with `Transfer-Encoding: chunked`.
    Chunked(&'b mut dyn ChunkProducer),
}

impl fmt::Debug for Body<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Empty => f.write_str("Empty"),
            Body::Fixed(b) => f.debug_tuple("Fixed").field(&b.len()).finish(),
            Body::Chunked(_) => f.write_str("Chunked"),
        }
    }
}

/// Caller-supplied buffer that captures the raw request bytes.
///
/// Diagnostic only: once the buffer is full, further bytes are dropped and the
/// request carries on.
#[derive(Debug)]
pub struct RequestLog<'l> {
    buf: &'l mut [u8],
    len: usize,
}

impl<'l> RequestLog<'l> {
    pub fn new(buf: &'l mut [u8]) -> Self {
        Self { buf, len: 0 }
    }

    /// Append as much of `data` as still fits.
    pub fn record(&mut self, data: &[u8]) {
        let n = data.len().min(self.buf.len() - self.len);
        self.buf[self.len..self.len + n].copy_from_slice(&data[..n]);
        self.len += n;
    }

    /// Number of bytes captured so far.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Forget the captured bytes so the buffer can log another request.
    pub fn clear(&mut self) {
        self.len = 0;
    }
}

/// Serializes one request onto a transport.
pub struct RequestBuilder<'w, 'l, C: Write> {
    transport: &'w mut C,
    log: Option<&'w mut RequestLog<'l>>,
    staged: Vec<u8, WRITE_BUFFER_LEN>,
    written: usize,
    error: Option<Error>,
}

impl<'w, 'l, C: Write> RequestBuilder<'w, 'l, C> {
    pub fn new(transport: &'w mut C, log: Option<&'w mut RequestLog<'l>>) -> Self {
        Self {
            transport,
            log,
            staged: Vec::new(),
            written: 0,
            error: None,
        }
    }

    /// Bytes accepted by the transport so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Write a complete request and flush the transport.
    ///
    /// `Host` comes first, taken from `headers` when the caller set one and
    /// from the URL otherwise. Caller `Content-Length` and `Transfer-Encoding`
    /// headers are never sent: framing always follows `body`.
    pub fn send(
        &mut self,
        method: Method,
        url: &Url<'_>,
        headers: &HeaderList,
        body: Body<'_>,
    ) -> Result<usize, Error> {
        debug!("http: {} {}{}", method.as_str(), url.host(), url.path());

        self.put(method.as_str().as_bytes())?;
        self.put(b" ")?;
        self.put(url.path().as_bytes())?;
        if let Some(query) = url.query() {
            self.put(b"?")?;
            self.put(query.as_bytes())?;
        }
        self.put(b" HTTP/1.1\r\n")?;

        match headers.get("Host") {
            Some(host) => self.header("Host", format_args!("{}", host))?,
            None => self.header("Host", format_args!("{}", url.authority()))?,
        }

        for header in headers {
            if header.is("Host") || header.is("Content-Length") || header.is("Transfer-Encoding") {
                continue;
            }
            self.put(header.name.as_bytes())?;
            self.put(b": ")?;
            self.put(header.value.as_bytes())?;
            self.put(b"\r\n")?;
        }

        match body {
            Body::Empty => {
                self.put(b"\r\n")?;
            }
            Body::Fixed(data) => {
                self.header("Content-Length", format_args!("{}", data.len()))?;
                self.put(b"\r\n")?;
                self.put(data)?;
            }
            Body::Chunked(producer) => {
                self.put(b"Transfer-Encoding: chunked\r\n\r\n")?;
                self.write_chunks(producer)?;
            }
        }

        self.flush()?;
        trace!("http: request written, {} bytes", self.written);
        Ok(self.written)
    }

    fn write_chunks(&mut self, producer: &mut dyn ChunkProducer) -> Result<(), Error> {
        loop {
            match producer.next_chunk() {
                // An empty chunk would read as the terminator on the wire.
                Chunk::Data([]) => continue,
                Chunk::Data(data) => {
                    self.format(format_args!("{:x}\r\n", data.len()))?;
                    self.put(data)?;
                    self.put(b"\r\n")?;
                }
                Chunk::EndOfBody => return self.put(b"0\r\n\r\n"),
            }
        }
    }

    fn header(&mut self, name: &str, value: fmt::Arguments<'_>) -> Result<(), Error> {
        self.put(name.as_bytes())?;
        self.put(b": ")?;
        self.format(value)?;
        self.put(b"\r\n")
    }

    fn format(&mut self, args: fmt::Arguments<'_>) -> Result<(), Error> {
        fmt::Write::write_fmt(self, args)
            .map_err(|_| self.error.take().unwrap_or(Error::TransportWriteError))
    }

    /// Stage `data`, spilling to the transport when the buffer fills.
    fn put(&mut self, data: &[u8]) -> Result<(), Error> {
        if self.staged.len() + data.len() > self.staged.capacity() {
            self.drain()?;
        }
        // Only fails when `data` alone exceeds the staging buffer.
        match self.staged.extend_from_slice(data) {
            Ok(()) => Ok(()),
            Err(_) => self.write_all(data),
        }
    }

    fn drain(&mut self) -> Result<(), Error> {
        if self.staged.is_empty() {
            return Ok(());
        }
        let staged = core::mem::take(&mut self.staged);
        self.write_all(&staged)
    }

    fn write_all(&mut self, mut data: &[u8]) -> Result<(), Error> {
        while !data.is_empty() {
            let n = match self.transport.write(data) {
                Ok(0) => {
                    warn!("http: transport accepted no bytes");
                    return Err(Error::TransportWriteError);
                }
                Ok(n) => n.min(data.len()),
                Err(_) => {
                    warn!("http: transport write failed");
                    return Err(Error::TransportWriteError);
                }
            };
            if let Some(log) = self.log.as_deref_mut() {
                log.record(&data[..n]);
            }
            self.written += n;
            data = &data[n..];
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.drain()?;
        self.transport
            .flush()
            .map_err(|_| Error::TransportWriteError)
    }
}

impl<C: Write> fmt::Write for RequestBuilder<'_, '_, C> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.put(s.as_bytes()).map_err(|e| {
            self.error = Some(e);
            fmt::Error
        })
    }
}

impl<C: Write> fmt::Debug for RequestBuilder<'_, '_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("staged", &self.staged.len())
            .field("written", &self.written)
            .finish_non_exhaustive()
    }
}
