use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::body::Body;
use crate::error::DictionaryError;
use crate::http::{HeaderMap, Method, StatusCode};

/// Outbound request description for a call to the dictionary API.
///
/// The target is a WHATWG-parsed [`Url`] rather than an `http::Uri` so that characters a browser
/// would percent-encode (spaces, non-ASCII) are accepted and encoded the same way.
pub struct UpstreamRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
}

impl UpstreamRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn into_parts(self) -> (Method, Url, HeaderMap) {
        (self.method, self.url, self.headers)
    }
}

impl fmt::Debug for UpstreamRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .finish()
    }
}

pub struct UpstreamResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Body,
}

impl UpstreamResponse {
    pub fn new(status: StatusCode, body: Body) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn into_body(self) -> Body {
        self.body
    }
}

impl fmt::Debug for UpstreamResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamResponse")
            .field("status", &self.status)
            .field("body", &self.body)
            .finish()
    }
}

/// Transport used to reach the dictionary API. Each host supplies its own implementation.
#[async_trait(?Send)]
pub trait UpstreamClient: Send + Sync {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, DictionaryError>;
}

/// Cheaply cloneable handle to the host's [`UpstreamClient`], carried in request extensions.
#[derive(Clone)]
pub struct UpstreamHandle {
    client: Arc<dyn UpstreamClient>,
}

impl UpstreamHandle {
    pub fn new(client: Arc<dyn UpstreamClient>) -> Self {
        Self { client }
    }

    pub fn with_client<C>(client: C) -> Self
    where
        C: UpstreamClient + 'static,
    {
        Self {
            client: Arc::new(client),
        }
    }

    pub async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, DictionaryError> {
        self.client.send(request).await
    }
}

impl fmt::Debug for UpstreamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamHandle").finish_non_exhaustive()
    }
}
