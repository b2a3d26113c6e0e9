//! Exchanges against a real server. Run with `cargo test -- --ignored`;
//! `TEST_HTTP_ADDRESS` (read from `.env` if present) picks the host.

use dotenvy::dotenv;
use libiot_http::http::{self, HttpRequest, Method, chunked};
use libiot_http::network::error::Error;
use libiot_http::network::{Close, Connect, Connection, Read, Write};
use std::env;
use std::io::{Read as StdRead, Write as StdWrite};
use std::net::TcpStream;
use std::time::Duration;

struct NetConnection {
    stream: TcpStream,
}

impl Read for NetConnection {
    type Error = Error;
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.stream.read(buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::WouldBlock {
                Error::Timeout
            } else {
                Error::ReadError
            }
        })
    }
}

impl Write for NetConnection {
    type Error = Error;
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.stream.write(buf).map_err(|_| Error::WriteError)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.stream.flush().map_err(|_| Error::WriteError)
    }
}

impl Close for NetConnection {
    type Error = Error;
    fn close(self) -> Result<(), Self::Error> {
        self.stream
            .shutdown(std::net::Shutdown::Both)
            .map_err(|_| Error::ConnectionClosed)
    }
}

impl Connection for NetConnection {}

struct TcpConnector;

impl Connect for TcpConnector {
    type Connection = NetConnection;
    type Error = Error;

    fn connect(&mut self, remote: &str) -> Result<Self::Connection, Self::Error> {
        let stream = TcpStream::connect(remote).map_err(|_| Error::ConnectionRefused)?;
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .map_err(|_| Error::InvalidAddress)?;
        Ok(NetConnection { stream })
    }
}

fn base_url() -> String {
    dotenv().ok();
    let address = env::var("TEST_HTTP_ADDRESS").unwrap_or("httpbin.org:80".to_string());
    format!("http://{}", address)
}

#[test]
#[ignore = "needs network access"]
fn test_http_status_teapot() {
    let url = format!("{}/status/418", base_url());
    let mut conn = http::open(&mut TcpConnector, &url).expect("Failed to connect to server");

    let mut request = HttpRequest::new(&mut conn, Method::Get, &url);
    let response = request.send().unwrap();
    assert_eq!(response.status_code(), 418);
    drop(request);
    conn.close().unwrap();
}

#[test]
#[ignore = "needs network access"]
fn test_http_post_json() {
    let url = format!("{}/post", base_url());
    let mut conn = http::open(&mut TcpConnector, &url).expect("Failed to connect to server");
    let mut log = [0u8; 512];

    let mut request = HttpRequest::new(&mut conn, Method::Post, &url);
    request.set_header("Content-Type", "application/json").unwrap();
    request.set_request_log_buffer(&mut log);
    let response = request.send_body(br#"{"hello":"world"}"#).unwrap();
    assert_eq!(response.status_code(), 200);
    assert!(request.request_log_len() > 0);
}

#[test]
#[ignore = "needs network access"]
fn test_http_post_chunked() {
    let url = format!("{}/post", base_url());
    let mut conn = http::open(&mut TcpConnector, &url).expect("Failed to connect to server");

    let parts: [&[u8]; 2] = [b"{\"message\":", b"\"chunked\"}"];
    let mut it = parts.into_iter();
    let mut producer = chunked::from_fn(move || it.next());

    let mut request: HttpRequest<'_, _, 4096> =
        HttpRequest::with_body_capacity(&mut conn, Method::Post, &url);
    request.set_header("Content-Type", "application/json").unwrap();
    let response = request.send_chunked(&mut producer).unwrap();
    assert_eq!(response.status_code(), 200);
    assert!(response.body_as_str().unwrap().contains("chunked"));
}
