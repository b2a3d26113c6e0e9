//! Minimal URL parsing for request targets.
//!
//! Only the parts an HTTP/1.1 client needs are extracted: scheme, host, port,
//! path and query. All parts borrow from the input string.

use super::error::Error;
use core::fmt;

/// URL scheme. Determines the default port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// Plain `http`, default port 80.
    Http,
    /// `https`, default port 443. TLS itself is the transport's job.
    Https,
}

impl Scheme {
    /// The port used when the URL does not name one.
    pub fn default_port(&self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }

    fn parse(s: &str) -> Result<Self, Error> {
        if s.eq_ignore_ascii_case("http") {
            Ok(Scheme::Http)
        } else if s.eq_ignore_ascii_case("https") {
            Ok(Scheme::Https)
        } else {
            Err(Error::InvalidUrl)
        }
    }
}

/// A parsed `scheme://host[:port]/path[?query]` URL.
///
/// # Examples
///
/// ```rust
/// use libiot_http::http::url::{Scheme, Url};
///
/// let url = Url::parse("https://reqres.in/api/users?page=2").unwrap();
/// assert_eq!(url.scheme(), Scheme::Https);
/// assert_eq!(url.host(), "reqres.in");
/// assert_eq!(url.port(), 443);
/// assert_eq!(url.path(), "/api/users");
/// assert_eq!(url.query(), Some("page=2"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Url<'a> {
    scheme: Scheme,
    host: &'a str,
    port: u16,
    path: &'a str,
    query: Option<&'a str>,
}

impl<'a> Url<'a> {
    /// Parse an absolute `http` or `https` URL.
    ///
    /// A missing path becomes `/`. Fragments are dropped. User info
    /// (`user@host`) is rejected; use basic auth on the request instead.
    pub fn parse(input: &'a str) -> Result<Self, Error> {
        let (scheme, rest) = input.split_once("://").ok_or(Error::InvalidUrl)?;
        let scheme = Scheme::parse(scheme)?;

        let rest = match rest.find('#') {
            Some(pos) => &rest[..pos],
            None => rest,
        };

        let authority_end = rest.find(['/', '?']).unwrap_or(rest.len());
        let (authority, target) = rest.split_at(authority_end);
        if authority.contains('@') {
            return Err(Error::InvalidUrl);
        }

        let (host, port) = split_host_port(authority)?;
        let port = match port {
            Some(p) => p.parse::<u16>().map_err(|_| Error::InvalidUrl)?,
            None => scheme.default_port(),
        };

        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target, None),
        };
        let path = if path.is_empty() { "/" } else { path };

        Ok(Self {
            scheme,
            host,
            port,
            path,
            query,
        })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn host(&self) -> &'a str {
        self.host
    }

    /// Explicit port, or the scheme default.
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn path(&self) -> &'a str {
        self.path
    }

    pub fn query(&self) -> Option<&'a str> {
        self.query
    }

    /// Value for the `Host` header: the port is only shown when it differs
    /// from the scheme default.
    pub fn authority(&self) -> Authority<'a> {
        Authority {
            host: self.host,
            port: (self.port != self.scheme.default_port()).then_some(self.port),
        }
    }

    /// `host:port` form handed to a [`crate::network::Connect`] implementation.
    pub fn remote(&self) -> Authority<'a> {
        Authority {
            host: self.host,
            port: Some(self.port),
        }
    }
}

/// A host with an optional port, displayed as `host[:port]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authority<'a> {
    host: &'a str,
    port: Option<u16>,
}

impl fmt::Display for Authority<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        Ok(())
    }
}

fn split_host_port(authority: &str) -> Result<(&str, Option<&str>), Error> {
    // Bracketed IPv6 literal keeps its brackets, as the Host header needs them.
    let (host, port) = if authority.starts_with('[') {
        let close = authority.find(']').ok_or(Error::InvalidUrl)?;
        let (host, tail) = authority.split_at(close + 1);
        match tail {
            "" => (host, None),
            _ => (host, Some(tail.strip_prefix(':').ok_or(Error::InvalidUrl)?)),
        }
    } else {
        match authority.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (authority, None),
        }
    };

    if host.is_empty() || host.contains(char::is_whitespace) {
        return Err(Error::InvalidUrl);
    }
    Ok((host, port))
}
