//! Incremental HTTP/1.1 response parser.
//!
//! The parser is push-based: the caller hands it whatever the transport
//! returned, in any fragment size, and it consumes bytes only up to the end of
//! the response. Nothing is re-scanned and the whole response never has to sit
//! in one buffer; only the current line is accumulated.
//!
//! Body framing follows RFC 7230 section 3.3.3:
//!
//! 1. Responses to `HEAD`, and `1xx`, `204` and `304` responses have no body.
//! 2. A `Transfer-Encoding` whose last coding is `chunked` means chunked.
//! 3. Otherwise `Content-Length` gives a fixed length.
//! 4. Otherwise the body runs until the peer closes the stream.

use super::error::Error;
use super::header::{Header, HeaderList};
use super::response::Response;
use super::{MAX_LINE_LEN, MAX_STATUS_MESSAGE_LEN};
use heapless::{String, Vec};

/// Receives decoded body bytes as they are parsed.
pub trait BodySink {
    /// Accept the next piece of the decoded body.
    fn on_body(&mut self, data: &[u8]) -> Result<(), Error>;
}

/// Buffers the body; running out of capacity fails the response.
impl<const N: usize> BodySink for Vec<u8, N> {
    fn on_body(&mut self, data: &[u8]) -> Result<(), Error> {
        self.extend_from_slice(data)
            .map_err(|_| Error::ResponseTooLarge)
    }
}

/// Streams the body to a callback instead of buffering it.
impl BodySink for dyn FnMut(&[u8]) + '_ {
    fn on_body(&mut self, data: &[u8]) -> Result<(), Error> {
        self(data);
        Ok(())
    }
}

impl<S: BodySink + ?Sized> BodySink for &mut S {
    fn on_body(&mut self, data: &[u8]) -> Result<(), Error> {
        (**self).on_body(data)
    }
}

/// How the body of the current response is delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Exactly this many bytes (`Content-Length`, or zero for bodiless responses).
    Fixed(usize),
    /// `Transfer-Encoding: chunked`.
    Chunked,
    /// Everything until the peer closes the stream.
    UntilClose,
}

/// Result of one [`ResponseParser::feed`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Bytes of the input that belong to this response.
    pub consumed: usize,
    /// The response is complete; anything after `consumed` is not ours.
    pub complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    StatusLine,
    Headers,
    Fixed { remaining: usize },
    ChunkSize,
    ChunkData { remaining: usize },
    ChunkDataEnd,
    Trailers,
    UntilClose,
    Complete,
    Failed(Error),
}

/// Response state machine.
///
/// # Examples
///
/// ```rust
/// use libiot_http::http::parser::ResponseParser;
///
/// let mut parser = ResponseParser::new();
/// let mut body: heapless::Vec<u8, 64> = heapless::Vec::new();
///
/// parser.feed(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chu", &mut body).unwrap();
/// let progress = parser
///     .feed(b"nked\r\n\r\n4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n", &mut body)
///     .unwrap();
///
/// assert!(progress.complete);
/// assert_eq!(&body[..], b"Wikipedia");
/// ```
#[derive(Debug, Clone)]
pub struct ResponseParser {
    state: State,
    line: Vec<u8, MAX_LINE_LEN>,
    head_request: bool,
    status_code: u16,
    status_message: String<MAX_STATUS_MESSAGE_LEN>,
    headers: HeaderList,
    trailers: HeaderList,
    body_kind: Option<BodyKind>,
    body_len: usize,
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseParser {
    pub fn new() -> Self {
        Self {
            state: State::StatusLine,
            line: Vec::new(),
            head_request: false,
            status_code: 0,
            status_message: String::new(),
            headers: HeaderList::new(),
            trailers: HeaderList::new(),
            body_kind: None,
            body_len: 0,
        }
    }

    /// Parser for the response to a `HEAD` request: headers only, whatever
    /// `Content-Length` says.
    pub fn for_head_request() -> Self {
        Self {
            head_request: true,
            ..Self::new()
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn headers(&self) -> &HeaderList {
        &self.headers
    }

    pub fn trailers(&self) -> &HeaderList {
        &self.trailers
    }

    /// Body framing, known once the header block has been parsed.
    pub fn body_kind(&self) -> Option<BodyKind> {
        self.body_kind
    }

    /// Decoded body bytes delivered to the sink so far.
    pub fn body_len(&self) -> usize {
        self.body_len
    }

    pub fn is_complete(&self) -> bool {
        self.state == State::Complete
    }

    /// The error that stopped the parser, if any.
    pub fn error(&self) -> Option<Error> {
        match self.state {
            State::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Consume the next fragment of the response.
    ///
    /// Stops at the end of the response, so `consumed` may be smaller than
    /// `input.len()`. Once failed, the parser keeps returning the same error.
    pub fn feed<S: BodySink + ?Sized>(
        &mut self,
        input: &[u8],
        sink: &mut S,
    ) -> Result<Progress, Error> {
        let mut pos = 0;
        loop {
            match self.state {
                State::Complete => break,
                State::Failed(e) => return Err(e),
                _ if pos == input.len() => break,
                _ => {}
            }
            match self.step(&input[pos..], sink) {
                Ok(n) => pos += n,
                Err(e) => {
                    warn!("http: response parse failed: {}", e);
                    self.state = State::Failed(e);
                    return Err(e);
                }
            }
        }
        Ok(Progress {
            consumed: pos,
            complete: self.is_complete(),
        })
    }

    /// Signal that the transport reached end-of-stream.
    ///
    /// Completes a close-delimited body; anywhere else the response is cut
    /// short and the parser fails with [`Error::UnexpectedEndOfStream`].
    pub fn finish(&mut self) -> Result<(), Error> {
        match self.state {
            State::Complete => Ok(()),
            State::UntilClose => {
                self.state = State::Complete;
                Ok(())
            }
            State::Failed(e) => Err(e),
            _ => {
                warn!("http: stream ended mid-response");
                self.state = State::Failed(Error::UnexpectedEndOfStream);
                Err(Error::UnexpectedEndOfStream)
            }
        }
    }

    /// Move the parsed head and the buffered body into a [`Response`].
    ///
    /// Only a complete parse yields a response; partial data is dropped.
    pub fn into_response<const N: usize>(self, body: Vec<u8, N>) -> Result<Response<N>, Error> {
        match self.state {
            State::Complete => Ok(Response::new(
                self.status_code,
                self.status_message,
                self.headers,
                self.trailers,
                body,
                self.body_len,
            )),
            State::Failed(e) => Err(e),
            _ => Err(Error::UnexpectedEndOfStream),
        }
    }

    /// Advance by at least one byte of `input` (which is never empty).
    fn step<S: BodySink + ?Sized>(&mut self, input: &[u8], sink: &mut S) -> Result<usize, Error> {
        match self.state {
            State::Fixed { remaining } => {
                let n = remaining.min(input.len());
                self.deliver(&input[..n], sink)?;
                self.state = match remaining - n {
                    0 => State::Complete,
                    remaining => State::Fixed { remaining },
                };
                Ok(n)
            }
            State::ChunkData { remaining } => {
                let n = remaining.min(input.len());
                self.deliver(&input[..n], sink)?;
                self.state = match remaining - n {
                    0 => State::ChunkDataEnd,
                    remaining => State::ChunkData { remaining },
                };
                Ok(n)
            }
            State::UntilClose => {
                self.deliver(input, sink)?;
                Ok(input.len())
            }
            _ => {
                let (n, done) = self.take_line(input)?;
                if done {
                    let line = core::mem::take(&mut self.line);
                    let result = self.on_line(&line);
                    self.line = line;
                    self.line.clear();
                    result?;
                }
                Ok(n)
            }
        }
    }

    fn deliver<S: BodySink + ?Sized>(&mut self, data: &[u8], sink: &mut S) -> Result<(), Error> {
        sink.on_body(data)?;
        self.body_len += data.len();
        Ok(())
    }

    /// Accumulate up to and including the next LF. Returns bytes consumed and
    /// whether a full line (without its CRLF) is now in `self.line`.
    fn take_line(&mut self, input: &[u8]) -> Result<(usize, bool), Error> {
        let (chunk, consumed, done) = match input.iter().position(|&b| b == b'\n') {
            Some(lf) => (&input[..lf], lf + 1, true),
            None => (input, input.len(), false),
        };
        self.line
            .extend_from_slice(chunk)
            .map_err(|_| Error::ResponseTooLarge)?;
        if done && self.line.last() == Some(&b'\r') {
            self.line.pop();
        }
        Ok((consumed, done))
    }

    fn on_line(&mut self, line: &[u8]) -> Result<(), Error> {
        match self.state {
            State::StatusLine => {
                // Stray blank lines before the status line are tolerated.
                if !line.is_empty() {
                    self.on_status_line(line)?;
                    self.state = State::Headers;
                }
                Ok(())
            }
            State::Headers if line.is_empty() => self.on_headers_end(),
            State::Headers => {
                let header = parse_header_line(line)?;
                self.headers
                    .append(header)
                    .map_err(|_| Error::ResponseTooLarge)
            }
            State::ChunkSize => {
                self.state = match parse_chunk_size(line)? {
                    0 => State::Trailers,
                    remaining => State::ChunkData { remaining },
                };
                Ok(())
            }
            State::ChunkDataEnd => {
                if !line.is_empty() {
                    return Err(Error::MalformedChunkSize);
                }
                self.state = State::ChunkSize;
                Ok(())
            }
            State::Trailers if line.is_empty() => {
                self.state = State::Complete;
                Ok(())
            }
            State::Trailers => {
                let trailer = parse_header_line(line)?;
                self.trailers
                    .append(trailer)
                    .map_err(|_| Error::ResponseTooLarge)
            }
            // Body states never hand over lines.
            _ => Ok(()),
        }
    }

    fn on_status_line(&mut self, line: &[u8]) -> Result<(), Error> {
        let (code, message) = parse_status_line(line)?;
        self.status_code = code;
        self.status_message.clear();
        // Reason phrases are informational; keep what fits.
        let mut end = message.len().min(MAX_STATUS_MESSAGE_LEN);
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        let _ = self.status_message.push_str(&message[..end]);
        debug!("http: status {}", code);
        Ok(())
    }

    fn on_headers_end(&mut self) -> Result<(), Error> {
        let code = self.status_code;
        // Interim responses are followed by the real one.
        if (100..200).contains(&code) && code != 101 {
            trace!("http: skipping interim {} response", code);
            self.headers = HeaderList::new();
            self.state = State::StatusLine;
            return Ok(());
        }

        let kind = self.select_body_kind()?;
        self.body_kind = Some(kind);
        self.state = match kind {
            BodyKind::Fixed(0) => State::Complete,
            BodyKind::Fixed(remaining) => State::Fixed { remaining },
            BodyKind::Chunked => State::ChunkSize,
            BodyKind::UntilClose => State::UntilClose,
        };
        Ok(())
    }

    fn select_body_kind(&self) -> Result<BodyKind, Error> {
        let code = self.status_code;
        if self.head_request || (100..200).contains(&code) || code == 204 || code == 304 {
            return Ok(BodyKind::Fixed(0));
        }

        let chunked = self
            .headers
            .get_all("Transfer-Encoding")
            .filter_map(|v| v.rsplit(',').map(str::trim).find(|c| !c.is_empty()))
            .last()
            .is_some_and(|coding| coding.eq_ignore_ascii_case("chunked"));
        if chunked {
            return Ok(BodyKind::Chunked);
        }

        let mut length: Option<usize> = None;
        for value in self.headers.get_all("Content-Length") {
            for part in value.split(',') {
                let part = part.trim();
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(Error::MalformedHeaderLine);
                }
                let n = part
                    .parse::<usize>()
                    .map_err(|_| Error::MalformedHeaderLine)?;
                match length {
                    Some(prev) if prev != n => return Err(Error::MalformedHeaderLine),
                    _ => length = Some(n),
                }
            }
        }

        Ok(match length {
            Some(n) => BodyKind::Fixed(n),
            None => BodyKind::UntilClose,
        })
    }
}

/// `HTTP/<major>.<minor> <3-digit code>[ <reason>]`
fn parse_status_line(line: &[u8]) -> Result<(u16, &str), Error> {
    let line = core::str::from_utf8(line).map_err(|_| Error::MalformedStatusLine)?;
    let (version, rest) = line.split_once(' ').ok_or(Error::MalformedStatusLine)?;

    let (major, minor) = version
        .strip_prefix("HTTP/")
        .and_then(|v| v.split_once('.'))
        .ok_or(Error::MalformedStatusLine)?;
    if !is_digits(major) || !is_digits(minor) {
        return Err(Error::MalformedStatusLine);
    }

    let (code, reason) = rest.split_once(' ').unwrap_or((rest, ""));
    if code.len() != 3 || !is_digits(code) {
        return Err(Error::MalformedStatusLine);
    }
    let code = code.parse().map_err(|_| Error::MalformedStatusLine)?;
    Ok((code, reason.trim()))
}

fn parse_header_line(line: &[u8]) -> Result<Header, Error> {
    // Obsolete line folding is not supported.
    if matches!(line.first(), Some(b' ' | b'\t')) || line.contains(&b'\r') {
        return Err(Error::MalformedHeaderLine);
    }
    let line = core::str::from_utf8(line).map_err(|_| Error::MalformedHeaderLine)?;
    let (name, value) = line.split_once(':').ok_or(Error::MalformedHeaderLine)?;
    if name.is_empty() || name.contains(|c: char| c.is_ascii_whitespace()) {
        return Err(Error::MalformedHeaderLine);
    }
    Header::new(name, value.trim()).map_err(|_| Error::ResponseTooLarge)
}

/// `<hex>[;extension]`
fn parse_chunk_size(line: &[u8]) -> Result<usize, Error> {
    let line = core::str::from_utf8(line).map_err(|_| Error::MalformedChunkSize)?;
    let size = match line.split_once(';') {
        Some((size, _ext)) => size,
        None => line,
    }
    .trim();
    if size.is_empty() || !size.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::MalformedChunkSize);
    }
    usize::from_str_radix(size, 16).map_err(|_| Error::MalformedChunkSize)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
