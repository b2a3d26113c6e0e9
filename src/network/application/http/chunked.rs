//! Pull-based producers for chunked request bodies.
//!
//! A [`ChunkProducer`] hands the request builder one piece of the body at a
//! time, so a device can upload a payload that never exists in memory as a
//! whole (sensor logs streamed out of flash, for example).
//!
//! ```rust
//! use libiot_http::http::chunked::{self, Chunk, ChunkProducer};
//!
//! let parts: [&[u8]; 2] = [b"{\"message\":", b"\"hi\"}"];
//! let mut it = parts.into_iter();
//! let mut producer = chunked::from_fn(move || it.next());
//!
//! assert_eq!(producer.next_chunk(), Chunk::Data(b"{\"message\":"));
//! assert_eq!(producer.next_chunk(), Chunk::Data(b"\"hi\"}"));
//! assert_eq!(producer.next_chunk(), Chunk::EndOfBody);
//! ```

use core::marker::PhantomData;

/// One step of a chunked body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chunk<'a> {
    /// More body bytes. An empty slice is allowed and simply skipped.
    Data(&'a [u8]),
    /// No more data; the builder writes the terminating `0\r\n\r\n`.
    EndOfBody,
}

/// Source of a chunked request body.
///
/// Called repeatedly, never concurrently, until it returns
/// [`Chunk::EndOfBody`]. The producer owns its cursor and must only move
/// forward. It is called at least once, even for an empty body.
pub trait ChunkProducer {
    /// Return the next piece of the body.
    fn next_chunk(&mut self) -> Chunk<'_>;
}

impl<P: ChunkProducer + ?Sized> ChunkProducer for &mut P {
    fn next_chunk(&mut self) -> Chunk<'_> {
        (**self).next_chunk()
    }
}

/// Producer backed by a closure; `None` ends the body.
pub struct FromFn<'a, F> {
    f: F,
    _data: PhantomData<&'a [u8]>,
}

/// Turn a closure returning `Option<&[u8]>` into a [`ChunkProducer`].
pub fn from_fn<'a, F>(f: F) -> FromFn<'a, F>
where
    F: FnMut() -> Option<&'a [u8]>,
{
    FromFn {
        f,
        _data: PhantomData,
    }
}

impl<'a, F> ChunkProducer for FromFn<'a, F>
where
    F: FnMut() -> Option<&'a [u8]>,
{
    fn next_chunk(&mut self) -> Chunk<'_> {
        match (self.f)() {
            Some(data) => Chunk::Data(data),
            None => Chunk::EndOfBody,
        }
    }
}

impl<F> core::fmt::Debug for FromFn<'_, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FromFn").finish_non_exhaustive()
    }
}

/// Splits a borrowed buffer into fixed-size chunks.
///
/// Useful when the body is already in memory but the peer expects chunked
/// framing, or to bound the size of each write.
#[derive(Debug, Clone)]
pub struct SliceChunks<'a> {
    data: &'a [u8],
    chunk_size: usize,
}

impl<'a> SliceChunks<'a> {
    /// `chunk_size` of zero is treated as one.
    pub fn new(data: &'a [u8], chunk_size: usize) -> Self {
        Self {
            data,
            chunk_size: chunk_size.max(1),
        }
    }
}

impl ChunkProducer for SliceChunks<'_> {
    fn next_chunk(&mut self) -> Chunk<'_> {
        if self.data.is_empty() {
            return Chunk::EndOfBody;
        }
        let n = self.chunk_size.min(self.data.len());
        let (head, tail) = self.data.split_at(n);
        self.data = tail;
        Chunk::Data(head)
    }
}
