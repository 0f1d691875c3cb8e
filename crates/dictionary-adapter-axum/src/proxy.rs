use async_trait::async_trait;
use dictionary_core::body::Body;
use dictionary_core::error::DictionaryError;
use dictionary_core::http::{Method, StatusCode};
use dictionary_core::upstream::{UpstreamClient, UpstreamRequest, UpstreamResponse};
use reqwest::Client;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// `reqwest`-backed transport to the dictionary API.
///
/// No request timeout is configured; a lookup waits as long as the upstream does.
pub struct ReqwestUpstreamClient {
    client: Client,
}

impl ReqwestUpstreamClient {
    pub fn try_new() -> Result<Self, DictionaryError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(DictionaryError::internal)?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait(?Send)]
impl UpstreamClient for ReqwestUpstreamClient {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, DictionaryError> {
        let (method, url, headers) = request.into_parts();
        let response = self
            .client
            .request(reqwest_method(&method)?, url)
            .headers(headers)
            .send()
            .await
            .map_err(DictionaryError::internal)?;

        let status =
            StatusCode::from_u16(response.status().as_u16()).map_err(DictionaryError::internal)?;
        let response_headers = response.headers().clone();
        let bytes = response.bytes().await.map_err(DictionaryError::internal)?;

        let mut upstream_response = UpstreamResponse::new(status, Body::from_bytes(bytes));
        *upstream_response.headers_mut() = response_headers;
        Ok(upstream_response)
    }
}

fn reqwest_method(method: &Method) -> Result<reqwest::Method, DictionaryError> {
    reqwest::Method::from_bytes(method.as_str().as_bytes()).map_err(DictionaryError::internal)
}
