use super::builder::{Body, Method, RequestBuilder, RequestLog};
use super::chunked::ChunkProducer;
use super::error::Error;
use super::header::{Header, HeaderList};
use super::parser::{BodySink, ResponseParser};
use super::response::Response;
use super::url::Url;
use super::{DEFAULT_BODY_CAPACITY, MAX_HEADER_VALUE_LEN, MAX_JSON_BODY_LEN, RECEIVE_BUFFER_LEN};
use crate::network::{Connect, Read, Write};
use base64ct::{Base64, Encoding};
use core::fmt::Write as _;
use heapless::{String, Vec};
use serde::Serialize;

/// One HTTP request and, once sent, its response.
///
/// The request borrows an already-connected transport for its lifetime and
/// never closes it, so several requests can run one after another over the
/// same socket. Each `send*` call writes the request, then reads until the
/// response is complete or the exchange fails. On failure the partial
/// response is dropped and the error stays available through
/// [`HttpRequest::error`].
///
/// `N` is the response body capacity. Bodies streamed to a callback set with
/// [`HttpRequest::set_body_callback`] are not limited by it.
///
/// Response heads are held in fixed storage: at most
/// [`MAX_HEADERS`](super::MAX_HEADERS) headers (and as many trailers), names up
/// to [`MAX_HEADER_NAME_LEN`](super::MAX_HEADER_NAME_LEN) bytes and values up
/// to [`MAX_HEADER_VALUE_LEN`](super::MAX_HEADER_VALUE_LEN) bytes. A response
/// beyond any of these fails with [`Error::ResponseTooLarge`].
///
/// The transport is read in blocks, so the last read can run past the end of
/// the response. Those bytes are offered back through
/// [`Read::unread`](crate::network::Read::unread). A plain transport drops
/// them, which only matters if the peer sends ahead of the next request; wrap
/// the socket in [`KeepAlive`](super::KeepAlive) to keep them for the next
/// exchange.
///
/// # Examples
///
/// ```rust,no_run
/// use libiot_http::http::{HttpRequest, Method, chunked};
/// # use libiot_http::network::{Read, Write};
/// # struct TlsSocket;
/// # impl Read for TlsSocket {
/// #     type Error = ();
/// #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
/// # }
/// # impl Write for TlsSocket {
/// #     type Error = ();
/// #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
/// #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
/// # }
///
/// let mut socket = TlsSocket;
/// let mut log = [0u8; 2048];
///
/// let parts: [&[u8]; 3] = [b"{\"message\":", b"\"this is an example", b" of chunked encoding\"}"];
/// let mut parts = parts.into_iter();
/// let mut producer = chunked::from_fn(move || parts.next());
///
/// let mut request = HttpRequest::new(&mut socket, Method::Post, "https://reqres.in/api/users");
/// request.set_header("Content-Type", "application/json").unwrap();
/// request.set_request_log_buffer(&mut log);
///
/// if request.send_chunked(&mut producer).is_err() {
///     let _code = request.error();
/// }
/// let _raw_len = request.request_log_len();
/// ```
pub struct HttpRequest<'a, C, const N: usize = DEFAULT_BODY_CAPACITY>
where
    C: Read + Write,
{
    transport: &'a mut C,
    method: Method,
    url: Result<Url<'a>, Error>,
    headers: HeaderList,
    log: Option<RequestLog<'a>>,
    on_body: Option<&'a mut dyn FnMut(&[u8])>,
    response: Option<Response<N>>,
    error: Option<Error>,
}

impl<'a, C: Read + Write> HttpRequest<'a, C> {
    /// Create a request with the default body capacity.
    ///
    /// An unparseable URL is not reported here; it surfaces as
    /// [`Error::InvalidUrl`] from the first `send*` call.
    pub fn new(transport: &'a mut C, method: Method, url: &'a str) -> Self {
        Self::with_body_capacity(transport, method, url)
    }
}

impl<'a, C: Read + Write, const N: usize> HttpRequest<'a, C, N> {
    /// Create a request whose response body buffer holds `N` bytes.
    pub fn with_body_capacity(transport: &'a mut C, method: Method, url: &'a str) -> Self {
        Self {
            transport,
            method,
            url: Url::parse(url),
            headers: HeaderList::new(),
            log: None,
            on_body: None,
            response: None,
            error: None,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// The parsed URL, or the reason it could not be parsed.
    pub fn url(&self) -> Result<Url<'a>, Error> {
        self.url
    }

    pub fn headers(&self) -> &HeaderList {
        &self.headers
    }

    /// Set a header, replacing any header with the same name (compared
    /// case-insensitively) in its original position.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), Error> {
        self.headers.set(Header::new(name, value)?)
    }

    /// Add a header, keeping earlier headers with the same name.
    pub fn append_header(&mut self, name: &str, value: &str) -> Result<(), Error> {
        self.headers.append(Header::new(name, value)?)
    }

    /// Set `Authorization: Basic <base64(user:password)>`.
    pub fn set_basic_auth(&mut self, user: &str, password: &str) -> Result<(), Error> {
        let mut credentials: Vec<u8, MAX_HEADER_VALUE_LEN> = Vec::new();
        for part in [user.as_bytes(), b":", password.as_bytes()] {
            credentials
                .extend_from_slice(part)
                .map_err(|_| Error::InvalidHeader)?;
        }

        let mut encoded = [0u8; MAX_HEADER_VALUE_LEN];
        let encoded =
            Base64::encode(&credentials, &mut encoded).map_err(|_| Error::InvalidHeader)?;

        let mut value: String<MAX_HEADER_VALUE_LEN> = String::new();
        write!(value, "Basic {}", encoded).map_err(|_| Error::InvalidHeader)?;
        self.set_header("Authorization", &value)
    }

    /// Capture the raw request bytes into `buf`. Bytes past its end are
    /// dropped; the request itself is unaffected.
    pub fn set_request_log_buffer(&mut self, buf: &'a mut [u8]) {
        self.log = Some(RequestLog::new(buf));
    }

    /// Bytes captured in the request log by the last send.
    pub fn request_log_len(&self) -> usize {
        self.log.as_ref().map_or(0, RequestLog::len)
    }

    pub fn request_log(&self) -> Option<&[u8]> {
        self.log.as_ref().map(RequestLog::as_bytes)
    }

    /// Stream the response body to `callback` instead of buffering it.
    ///
    /// The response then reports the body length but an empty body.
    pub fn set_body_callback(&mut self, callback: &'a mut dyn FnMut(&[u8])) {
        self.on_body = Some(callback);
    }

    /// Send without a body.
    pub fn send(&mut self) -> Result<&Response<N>, Error> {
        self.exchange(Body::Empty)
    }

    /// Send `body` with a `Content-Length` header.
    pub fn send_body(&mut self, body: &[u8]) -> Result<&Response<N>, Error> {
        self.exchange(Body::Fixed(body))
    }

    /// Send a body pulled from `producer` with chunked transfer-encoding.
    pub fn send_chunked<P: ChunkProducer>(&mut self, producer: &mut P) -> Result<&Response<N>, Error> {
        self.exchange(Body::Chunked(producer))
    }

    /// Serialize `value` as JSON and send it as a fixed-length body.
    ///
    /// Adds `Content-Type: application/json` unless a content type is set.
    pub fn send_json<T: Serialize>(&mut self, value: &T) -> Result<&Response<N>, Error> {
        let body: Vec<u8, MAX_JSON_BODY_LEN> = match serde_json_core::to_vec(value) {
            Ok(body) => body,
            Err(_) => return Err(self.fail(Error::Serialize)),
        };
        if !self.headers.contains("Content-Type") {
            if let Err(e) = self.set_header("Content-Type", "application/json") {
                return Err(self.fail(e));
            }
        }
        self.exchange(Body::Fixed(&body))
    }

    /// Error recorded by the last failed send.
    pub fn error(&self) -> Option<Error> {
        self.error
    }

    /// Response of the last successful send.
    pub fn response(&self) -> Option<&Response<N>> {
        self.response.as_ref()
    }

    /// Release the response to the caller.
    pub fn take_response(&mut self) -> Option<Response<N>> {
        self.response.take()
    }

    fn exchange(&mut self, body: Body<'_>) -> Result<&Response<N>, Error> {
        self.response = None;
        self.error = None;
        match self.run(body) {
            Ok(response) => Ok(&*self.response.insert(response)),
            Err(e) => Err(self.fail(e)),
        }
    }

    fn fail(&mut self, e: Error) -> Error {
        warn!("http: request failed: {}", e);
        self.error = Some(e);
        e
    }

    fn run(&mut self, body: Body<'_>) -> Result<Response<N>, Error> {
        let url = self.url?;
        if let Some(log) = self.log.as_mut() {
            log.clear();
        }

        RequestBuilder::new(&mut *self.transport, self.log.as_mut()).send(
            self.method,
            &url,
            &self.headers,
            body,
        )?;

        let mut parser = match self.method {
            Method::Head => ResponseParser::for_head_request(),
            _ => ResponseParser::new(),
        };
        let mut buffered: Vec<u8, N> = Vec::new();
        match self.on_body.as_deref_mut() {
            Some(callback) => receive(&mut *self.transport, &mut parser, callback)?,
            None => receive(&mut *self.transport, &mut parser, &mut buffered)?,
        }
        parser.into_response(buffered)
    }
}

impl<C: Read + Write, const N: usize> core::fmt::Debug for HttpRequest<'_, C, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("response", &self.response)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

/// Read from `transport` into `parser` until the response is complete.
///
/// Bytes that arrive after the end of the response are handed back through
/// [`Read::unread`]; whatever the transport does not keep is dropped.
fn receive<R, S>(transport: &mut R, parser: &mut ResponseParser, sink: &mut S) -> Result<(), Error>
where
    R: Read + ?Sized,
    S: BodySink + ?Sized,
{
    let mut buf = [0u8; RECEIVE_BUFFER_LEN];
    loop {
        let n = match transport.read(&mut buf) {
            Ok(n) => n.min(buf.len()),
            Err(_) => {
                warn!("http: transport read failed");
                return Err(Error::TransportReadError);
            }
        };
        if n == 0 {
            return parser.finish();
        }
        let progress = parser.feed(&buf[..n], sink)?;
        if progress.complete {
            let extra = &buf[progress.consumed..n];
            if !extra.is_empty() {
                let kept = transport.unread(extra);
                if kept < extra.len() {
                    debug!("http: dropping {} bytes after response", extra.len() - kept);
                }
            }
            return Ok(());
        }
    }
}

/// Open a transport to the host and port of `url` through `connector`.
///
/// TLS setup, if any, is the connector's business.
pub fn open<T: Connect>(connector: &mut T, url: &str) -> Result<T::Connection, Error> {
    let url = Url::parse(url)?;
    let mut remote: String<MAX_HEADER_VALUE_LEN> = String::new();
    write!(remote, "{}", url.remote()).map_err(|_| Error::InvalidUrl)?;
    connector.connect(&remote).map_err(|_| {
        warn!("http: connect to {} failed", remote.as_str());
        Error::TransportOpenError
    })
}
