use criterion::{Criterion, Throughput};
use libiot_http::http::chunked::SliceChunks;
use libiot_http::http::{Body, Header, HeaderList, Method, RequestBuilder, Url};
use libiot_http::network::Write;
use std::hint::black_box;

/// Transport that discards everything, so only serialization is measured.
struct NullConnection {
    written: usize,
}

impl Write for NullConnection {
    type Error = ();

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.written += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

fn headers() -> HeaderList {
    let mut list = HeaderList::new();
    for (name, value) in [
        ("Content-Type", "application/json"),
        ("Accept", "*/*"),
        ("User-Agent", "libiot-http"),
    ] {
        list.append(Header::new(name, value).expect("Failed to build header"))
            .expect("Failed to add header");
    }
    list
}

pub fn bench_build_fixed(c: &mut Criterion) {
    let url = Url::parse("http://httpbin.org/post").expect("Failed to parse url");
    let headers = headers();
    let body = [b'x'; 1024];
    let mut group = c.benchmark_group("build_fixed");
    group.throughput(Throughput::Bytes(body.len() as u64));
    group.bench_function("build_fixed", |b| {
        b.iter(|| {
            let mut conn = NullConnection { written: 0 };
            RequestBuilder::new(&mut conn, None)
                .send(Method::Post, &url, &headers, Body::Fixed(black_box(&body)))
                .expect("Failed to send");
            conn.written
        })
    });
    group.finish();
}

pub fn bench_build_chunked(c: &mut Criterion) {
    let url = Url::parse("https://reqres.in/api/users").expect("Failed to parse url");
    let headers = headers();
    let body = [b'x'; 1024];
    let mut group = c.benchmark_group("build_chunked");
    group.throughput(Throughput::Bytes(body.len() as u64));
    group.bench_function("build_chunked", |b| {
        b.iter(|| {
            let mut conn = NullConnection { written: 0 };
            let mut producer = SliceChunks::new(black_box(&body), 128);
            RequestBuilder::new(&mut conn, None)
                .send(Method::Post, &url, &headers, Body::Chunked(&mut producer))
                .expect("Failed to send");
            conn.written
        })
    });
    group.finish();
}
