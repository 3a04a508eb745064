//! Rotating pool of outbound proxy endpoints.

use std::sync::atomic::{AtomicUsize, Ordering};

/// One parsed proxy endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyEndpoint {
    pub host: String,
    pub port: u16,
    /// `(user, password)` when the spec carried credentials.
    pub auth: Option<(String, String)>,
}

impl ProxyEndpoint {
    /// Parses a raw spec: `host:port` or `host:port:user:password`. Any other
    /// shape yields `None` and the spec is skipped.
    pub fn parse(spec: &str) -> Option<Self> {
        let spec = spec.trim();
        if spec.is_empty() {
            return None;
        }
        let parts: Vec<&str> = spec.split(':').collect();
        let (host, port, auth) = match parts.as_slice() {
            [host, port] => (*host, *port, None),
            [host, port, user, password] => {
                (*host, *port, Some((user.to_string(), password.to_string())))
            }
            _ => return None,
        };
        if host.is_empty() {
            return None;
        }
        let port: u16 = port.parse().ok()?;
        Some(Self {
            host: host.to_string(),
            port,
            auth,
        })
    }

    /// HTTP proxy URI, with credentials embedded when present.
    pub fn uri(&self) -> String {
        match &self.auth {
            Some((user, password)) => {
                format!("http://{}:{}@{}:{}", user, password, self.host, self.port)
            }
            None => format!("http://{}:{}", self.host, self.port),
        }
    }
}

/// Ordered proxy endpoints with a wrapping cursor.
///
/// The cursor is the pool's only mutable state; the consecutive rate-limit
/// counter lives on the request engine that drives it.
#[derive(Debug)]
pub struct ProxyPool {
    endpoints: Vec<ProxyEndpoint>,
    cursor: AtomicUsize,
}

impl ProxyPool {
    /// Builds a pool from raw specs, silently dropping malformed entries.
    pub fn from_specs<S: AsRef<str>>(specs: &[S]) -> Self {
        let endpoints = specs
            .iter()
            .filter_map(|s| ProxyEndpoint::parse(s.as_ref()))
            .collect();
        Self {
            endpoints,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Endpoint at the cursor, or `None` when the pool is empty (meaning
    /// "use the direct connection").
    pub fn current(&self) -> Option<&ProxyEndpoint> {
        if self.endpoints.is_empty() {
            return None;
        }
        Some(&self.endpoints[self.cursor.load(Ordering::SeqCst) % self.endpoints.len()])
    }

    /// Moves the cursor to the next endpoint, wrapping around.
    pub fn advance(&self) {
        if self.endpoints.is_empty() {
            return;
        }
        let len = self.endpoints.len();
        let _ = self
            .cursor
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| Some((c + 1) % len));
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
