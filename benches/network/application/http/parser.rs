use criterion::{Criterion, Throughput};
use libiot_http::http::ResponseParser;
use std::hint::black_box;

fn chunked_response() -> Vec<u8> {
    let mut raw = b"HTTP/1.1 200 OK\r\n\
Server: gunicorn/19.9.0\r\n\
Content-Type: application/octet-stream\r\n\
Transfer-Encoding: chunked\r\n\r\n"
        .to_vec();
    for _ in 0..16 {
        raw.extend_from_slice(b"40\r\n");
        raw.extend_from_slice(&[b'x'; 0x40]);
        raw.extend_from_slice(b"\r\n");
    }
    raw.extend_from_slice(b"0\r\n\r\n");
    raw
}

fn parse(raw: &[u8], fragment: usize) -> usize {
    let mut parser = ResponseParser::new();
    let mut body: heapless::Vec<u8, 2048> = heapless::Vec::new();
    for piece in raw.chunks(fragment) {
        parser.feed(piece, &mut body).expect("Failed to parse");
    }
    body.len()
}

pub fn bench_parse_whole(c: &mut Criterion) {
    let raw = chunked_response();
    let mut group = c.benchmark_group("parse_whole");
    group.throughput(Throughput::Bytes(raw.len() as u64));
    group.bench_function("parse_whole", |b| {
        b.iter(|| parse(black_box(&raw), raw.len()))
    });
    group.finish();
}

pub fn bench_parse_fragmented(c: &mut Criterion) {
    let raw = chunked_response();
    let mut group = c.benchmark_group("parse_fragmented");
    group.throughput(Throughput::Bytes(raw.len() as u64));
    for fragment in [1usize, 16, 256] {
        group.bench_function(format!("fragment_{}", fragment), |b| {
            b.iter(|| parse(black_box(&raw), fragment))
        });
    }
    group.finish();
}
