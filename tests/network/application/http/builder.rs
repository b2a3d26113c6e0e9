use crate::network::MockConnection;
use libiot_http::http::chunked::{self, SliceChunks};
use libiot_http::http::{Body, Header, HeaderList, Method, RequestBuilder, RequestLog, ResponseParser, Url};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Request as seen by a minimal server-side parser.
#[derive(Debug, PartialEq)]
struct ParsedRequest {
    method: String,
    target: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn dechunk(mut data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        let eol = find(data, b"\r\n").expect("chunk size line");
        let size = usize::from_str_radix(std::str::from_utf8(&data[..eol]).unwrap(), 16).unwrap();
        data = &data[eol + 2..];
        if size == 0 {
            assert_eq!(data, b"\r\n", "nothing may follow the last chunk");
            return out;
        }
        out.extend_from_slice(&data[..size]);
        assert_eq!(&data[size..size + 2], b"\r\n");
        data = &data[size + 2..];
    }
}

fn parse_request(raw: &[u8]) -> ParsedRequest {
    let head_end = find(raw, b"\r\n\r\n").expect("end of head");
    let head = std::str::from_utf8(&raw[..head_end]).unwrap();
    let rest = &raw[head_end + 4..];

    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap().split(' ');
    let method = request_line.next().unwrap().to_string();
    let target = request_line.next().unwrap().to_string();
    assert_eq!(request_line.next(), Some("HTTP/1.1"));

    let headers: Vec<(String, String)> = lines
        .map(|l| {
            let (n, v) = l.split_once(": ").unwrap();
            (n.to_string(), v.to_string())
        })
        .collect();
    let lookup = |name: &str| {
        headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    };

    let body = if lookup("Transfer-Encoding").as_deref() == Some("chunked") {
        dechunk(rest)
    } else {
        let len: usize = lookup("Content-Length").map_or(0, |v| v.parse().unwrap());
        assert_eq!(rest.len(), len, "body must match Content-Length");
        rest.to_vec()
    };

    ParsedRequest {
        method,
        target,
        headers,
        body,
    }
}

fn header_list(pairs: &[(&str, &str)]) -> HeaderList {
    let mut list = HeaderList::new();
    for (n, v) in pairs {
        list.append(Header::new(n, v).unwrap()).unwrap();
    }
    list
}

#[test]
fn test_fixed_requests_survive_reference_parse() {
    let methods = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Delete,
        Method::Patch,
        Method::Options,
    ];
    let header_sets: [&[(&str, &str)]; 3] = [
        &[],
        &[("Content-Type", "application/json")],
        &[("Accept", "*/*"), ("X-Device", "esp32c3"), ("x-device", "again")],
    ];
    let bodies: [&[u8]; 3] = [b"", b"{\"hello\":\"world\"}", &[0xA5; 700]];

    for method in methods {
        for pairs in header_sets {
            for body in bodies {
                let mut conn = MockConnection::new();
                conn.max_write = 17;
                let url = Url::parse("http://httpbin.org/anything/x?y=1").unwrap();
                let headers = header_list(pairs);

                RequestBuilder::new(&mut conn, None)
                    .send(method, &url, &headers, Body::Fixed(body))
                    .unwrap();

                let parsed = parse_request(&conn.sent);
                assert_eq!(parsed.method, method.as_str());
                assert_eq!(parsed.target, "/anything/x?y=1");
                assert_eq!(parsed.headers[0], ("Host".to_string(), "httpbin.org".to_string()));

                let mut expected: Vec<(String, String)> = pairs
                    .iter()
                    .map(|(n, v)| (n.to_string(), v.to_string()))
                    .collect();
                expected.push(("Content-Length".to_string(), body.len().to_string()));
                assert_eq!(&parsed.headers[1..], &expected[..]);
                assert_eq!(parsed.body, body);
            }
        }
    }
}

#[test]
fn test_empty_body_has_no_framing_headers() {
    let mut conn = MockConnection::new();
    let url = Url::parse("http://httpbin.org").unwrap();
    RequestBuilder::new(&mut conn, None)
        .send(Method::Head, &url, &HeaderList::new(), Body::Empty)
        .unwrap();
    assert_eq!(conn.sent_str(), "HEAD / HTTP/1.1\r\nHost: httpbin.org\r\n\r\n");
}

#[test]
fn test_chunked_round_trip_under_fragmentation() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for round in 0..32u64 {
        let chunks: Vec<Vec<u8>> = (0..rng.gen_range(1..8))
            .map(|_| {
                let len = rng.gen_range(1..300);
                (0..len).map(|_| rng.gen_range(0..=u8::MAX)).collect()
            })
            .collect();
        let expected: Vec<u8> = chunks.concat();

        let mut conn = MockConnection::new();
        conn.max_write = rng.gen_range(1..64);
        let url = Url::parse("https://reqres.in/api/users").unwrap();
        let mut it = chunks.iter();
        let mut producer = chunked::from_fn(move || it.next().map(Vec::as_slice));
        RequestBuilder::new(&mut conn, None)
            .send(Method::Post, &url, &HeaderList::new(), Body::Chunked(&mut producer))
            .unwrap();

        let request = parse_request(&conn.sent);
        assert_eq!(request.body, expected);

        // Decode the same chunked bytes with the response parser, fed in
        // random fragments.
        let body_start = find(&conn.sent, b"\r\n\r\n").unwrap() + 4;
        let mut raw = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n".to_vec();
        raw.extend_from_slice(&conn.sent[body_start..]);

        let mut parser = ResponseParser::new();
        let mut body: heapless::Vec<u8, 4096> = heapless::Vec::new();
        let mut pos = 0;
        let mut frag = StdRng::seed_from_u64(round);
        while pos < raw.len() {
            let end = (pos + frag.gen_range(1..40)).min(raw.len());
            let progress = parser.feed(&raw[pos..end], &mut body).unwrap();
            assert_eq!(progress.consumed, end - pos);
            pos = end;
        }
        assert!(parser.is_complete());
        assert_eq!(&body[..], &expected[..]);
    }
}

#[test]
fn test_empty_chunks_are_not_terminators() {
    let mut conn = MockConnection::new();
    let url = Url::parse("http://h/upload").unwrap();
    let parts: [&[u8]; 4] = [b"ab", b"", b"cd", b""];
    let mut it = parts.into_iter();
    let mut producer = chunked::from_fn(move || it.next());
    RequestBuilder::new(&mut conn, None)
        .send(Method::Post, &url, &HeaderList::new(), Body::Chunked(&mut producer))
        .unwrap();
    assert!(conn.sent_str().ends_with("\r\n\r\n2\r\nab\r\n2\r\ncd\r\n0\r\n\r\n"));
}

#[test]
fn test_log_mirrors_request_bytes() {
    let mut conn = MockConnection::new();
    let url = Url::parse("http://httpbin.org/post").unwrap();
    let mut buf = [0u8; 512];
    let mut log = RequestLog::new(&mut buf);
    let mut producer = SliceChunks::new(b"0123456789", 4);

    let written = RequestBuilder::new(&mut conn, Some(&mut log))
        .send(Method::Post, &url, &HeaderList::new(), Body::Chunked(&mut producer))
        .unwrap();

    assert_eq!(written, conn.sent.len());
    assert_eq!(log.as_bytes(), &conn.sent[..]);
}

#[test]
fn test_write_error_stops_request() {
    let mut conn = MockConnection::new();
    conn.fail_writes = true;
    let url = Url::parse("http://h/").unwrap();
    let err = RequestBuilder::new(&mut conn, None)
        .send(Method::Get, &url, &HeaderList::new(), Body::Empty)
        .unwrap_err();
    assert_eq!(err, libiot_http::http::Error::TransportWriteError);
}
