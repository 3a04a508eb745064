//! HTTP transport behind a trait so the request engine is testable.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, COOKIE, USER_AGENT};
use reqwest::Client as HttpClient;

use super::{MarketError, ProxyEndpoint};
use crate::config::MarketConfig;

/// Default per-request timeout; generous to tolerate a throttled upstream.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Browser-like user agent; the listing endpoints reject obvious bots.
const USER_AGENT_VALUE: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Raw response: status plus body text.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A single GET, optionally through a proxy. The engine owns retry and
/// throttling policy; implementations only move bytes.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(
        &self,
        url: &str,
        proxy: Option<&ProxyEndpoint>,
    ) -> Result<HttpResponse, MarketError>;
}

/// reqwest-backed transport.
///
/// reqwest binds a proxy to a client, not to a request, so one client is
/// built lazily per proxy endpoint next to the direct one. All clients share
/// the same default headers and session cookies.
pub struct HttpTransport {
    direct: HttpClient,
    proxied: Mutex<HashMap<String, HttpClient>>,
    headers: HeaderMap,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &MarketConfig) -> Result<Self, MarketError> {
        let timeout = if config.request_timeout.is_zero() {
            DEFAULT_REQUEST_TIMEOUT
        } else {
            config.request_timeout
        };

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        if !config.cookies.is_empty() {
            let value = HeaderValue::from_str(&config.cookies)
                .map_err(|e| MarketError::Request(format!("invalid cookie header: {}", e)))?;
            headers.insert(COOKIE, value);
        }

        let direct = HttpClient::builder()
            .timeout(timeout)
            .default_headers(headers.clone())
            .build()?;

        Ok(Self {
            direct,
            proxied: Mutex::new(HashMap::new()),
            headers,
            timeout,
        })
    }

    /// Returns the client for the given endpoint, building and caching it on
    /// first use.
    fn client_for(&self, proxy: Option<&ProxyEndpoint>) -> Result<HttpClient, MarketError> {
        let Some(endpoint) = proxy else {
            return Ok(self.direct.clone());
        };

        let uri = endpoint.uri();
        let mut proxied = self.proxied.lock().unwrap();
        if let Some(client) = proxied.get(&uri) {
            return Ok(client.clone());
        }

        let client = HttpClient::builder()
            .timeout(self.timeout)
            .default_headers(self.headers.clone())
            .proxy(reqwest::Proxy::all(&uri)?)
            .build()?;
        proxied.insert(uri, client.clone());
        Ok(client)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(
        &self,
        url: &str,
        proxy: Option<&ProxyEndpoint>,
    ) -> Result<HttpResponse, MarketError> {
        let client = self.client_for(proxy)?;
        let response = client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Scripted transport for engine and scanner tests.

    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns scripted responses in FIFO order, recording every request.
    #[derive(Default)]
    pub(crate) struct MockTransport {
        script: Mutex<VecDeque<HttpResponse>>,
        calls: AtomicUsize,
        urls: Mutex<Vec<String>>,
        proxies: Mutex<Vec<Option<String>>>,
    }

    impl MockTransport {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn push(&self, status: u16, body: &str) {
            self.script.lock().unwrap().push_back(HttpResponse {
                status,
                body: body.to_string(),
            });
        }

        pub(crate) fn push_many(&self, count: usize, status: u16, body: &str) {
            for _ in 0..count {
                self.push(status, body);
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub(crate) fn urls(&self) -> Vec<String> {
            self.urls.lock().unwrap().clone()
        }

        pub(crate) fn proxies_seen(&self) -> Vec<Option<String>> {
            self.proxies.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn get(
            &self,
            url: &str,
            proxy: Option<&ProxyEndpoint>,
        ) -> Result<HttpResponse, MarketError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.urls.lock().unwrap().push(url.to_string());
            self.proxies
                .lock()
                .unwrap()
                .push(proxy.map(|p| p.uri()));
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| MarketError::Request("mock script exhausted".to_string()))
        }
    }
}
