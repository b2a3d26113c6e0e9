//! Header storage shared by requests and responses.

use super::error::Error;
use super::{MAX_HEADER_NAME_LEN, MAX_HEADER_VALUE_LEN, MAX_HEADERS};
use heapless::{String, Vec};

/// A single `name: value` pair.
///
/// Names compare case-insensitively; the original spelling is kept for the
/// wire and for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String<MAX_HEADER_NAME_LEN>,
    pub value: String<MAX_HEADER_VALUE_LEN>,
}

impl Header {
    /// Build a header, rejecting names or values that are too long, an empty
    /// name, and anything containing CR or LF.
    pub fn new(name: &str, value: &str) -> Result<Self, Error> {
        if name.is_empty() || has_line_break(name) || has_line_break(value) {
            return Err(Error::InvalidHeader);
        }
        Ok(Self {
            name: String::try_from(name).map_err(|_| Error::InvalidHeader)?,
            value: String::try_from(value).map_err(|_| Error::InvalidHeader)?,
        })
    }

    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

fn has_line_break(s: &str) -> bool {
    s.bytes().any(|b| b == b'\r' || b == b'\n')
}

/// Ordered header list. Insertion order is wire order; duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderList {
    headers: Vec<Header, MAX_HEADERS>,
}

impl HeaderList {
    pub const fn new() -> Self {
        Self {
            headers: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.headers.is_full()
    }

    /// Header at wire position `ix`.
    pub fn at(&self, ix: usize) -> Option<&Header> {
        self.headers.get(ix)
    }

    /// Value of the first header called `name`, compared case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.is(name))
            .map(|h| h.value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h.is(name))
    }

    /// Values of every header called `name`, in wire order.
    pub fn get_all<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s str> + 's {
        self.headers
            .iter()
            .filter(move |h| h.is(name))
            .map(|h| h.value.as_str())
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Header> {
        self.headers.iter()
    }

    /// Add a header at the end, keeping any existing header of the same name.
    pub fn append(&mut self, header: Header) -> Result<(), Error> {
        self.headers.push(header).map_err(|_| Error::InvalidHeader)
    }

    /// Replace the value of the first header called `name`, keeping its
    /// position, and drop any later duplicates. Appends when absent.
    pub fn set(&mut self, header: Header) -> Result<(), Error> {
        match self.headers.iter().position(|h| h.is(&header.name)) {
            Some(pos) => {
                let mut ix = pos + 1;
                while ix < self.headers.len() {
                    if self.headers[ix].is(&header.name) {
                        self.headers.remove(ix);
                    } else {
                        ix += 1;
                    }
                }
                self.headers[pos] = header;
                Ok(())
            }
            None => self.append(header),
        }
    }

    /// Remove every header called `name`. Returns how many were removed.
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.headers.len();
        self.headers.retain(|h| !h.is(name));
        before - self.headers.len()
    }
}

impl<'a> IntoIterator for &'a HeaderList {
    type Item = &'a Header;
    type IntoIter = core::slice::Iter<'a, Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.headers.iter()
    }
}
