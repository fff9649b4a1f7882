//! [`WireClient`] over pooled `reqwest` clients.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use slurm_pool::HttpClientPool;
use tracing::debug;
use url::Url;

use crate::client::{BoxFuture, WireClient, WireRequest, WireResponse};
use crate::error::{WireError, WireResult};

/// Sends requests through a shared [`HttpClientPool`].
///
/// Every exchange holds a pool lease, so the pool sees the request as an
/// active connection until the body has been read.
#[derive(Debug, Clone)]
pub struct HttpWireClient {
    pool: Arc<HttpClientPool>,
    endpoint: String,
    base: Url,
    headers: HeaderMap,
}

impl HttpWireClient {
    /// Create a client for `endpoint`, e.g. `http://slurmrestd:6820`.
    pub fn new(pool: Arc<HttpClientPool>, endpoint: impl Into<String>) -> WireResult<Self> {
        let endpoint = endpoint.into();
        let mut base = Url::parse(&endpoint).map_err(|source| WireError::InvalidEndpoint {
            endpoint: endpoint.clone(),
            source,
        })?;
        // A trailing slash keeps any path prefix when joining.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            pool,
            endpoint,
            base,
            headers: HeaderMap::new(),
        })
    }

    /// Add a header sent with every request.
    pub fn with_header(mut self, name: &str, value: &str) -> WireResult<Self> {
        let invalid = || WireError::InvalidHeader {
            name: name.to_string(),
        };
        let name_bytes = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let mut value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        value.set_sensitive(true);
        self.headers.insert(name_bytes, value);
        Ok(self)
    }

    /// The endpoint this client talks to; also its pool key.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The pool this client draws from.
    #[must_use]
    pub fn pool(&self) -> &Arc<HttpClientPool> {
        &self.pool
    }

    fn url(&self, path: &str) -> WireResult<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|source| WireError::InvalidEndpoint {
                endpoint: path.to_string(),
                source,
            })
    }

    async fn send(&self, request: WireRequest) -> WireResult<WireResponse> {
        let url = self.url(&request.path)?;
        let lease = self.pool.acquire(&self.endpoint).await?;

        debug!(
            method = %request.method,
            path = %request.path,
            request_id = request.request_id.as_deref().unwrap_or("-"),
            "Sending request"
        );

        let mut builder = lease
            .client()
            .request(request.method.into(), url)
            .headers(self.headers.clone());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(WireError::from_reqwest)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(WireError::from_reqwest)?;
        drop(lease);

        debug!(status, bytes = body.len(), path = %request.path, "Received response");
        Ok(WireResponse {
            status,
            body: body.to_vec(),
        })
    }
}

impl WireClient for HttpWireClient {
    fn execute<'a>(&'a self, request: WireRequest) -> BoxFuture<'a, WireResult<WireResponse>> {
        Box::pin(self.send(request))
    }
}
