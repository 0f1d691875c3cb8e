use async_trait::async_trait;
use dictionary_core::body::Body;
use dictionary_core::error::DictionaryError;
use dictionary_core::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use dictionary_core::upstream::{UpstreamClient, UpstreamRequest, UpstreamResponse};
use worker::{Fetch, Headers, Method as CfMethod, Request as CfRequest, RequestInit};

/// Upstream transport backed by the Workers `fetch` API.
pub struct FetchUpstreamClient;

#[async_trait(?Send)]
impl UpstreamClient for FetchUpstreamClient {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, DictionaryError> {
        let (method, url, headers) = request.into_parts();

        let mut init = RequestInit::new();
        init.with_method(http_method_to_cf(&method));
        init.with_headers(Headers::from(&headers));
        let cf_request =
            CfRequest::new_with_init(url.as_str(), &init).map_err(DictionaryError::internal)?;

        let mut cf_response = Fetch::Request(cf_request)
            .send()
            .await
            .map_err(DictionaryError::internal)?;

        let status =
            StatusCode::from_u16(cf_response.status_code()).map_err(DictionaryError::internal)?;
        let mut response_headers = HeaderMap::new();
        for (name, value) in cf_response.headers().entries() {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(&value),
            ) {
                response_headers.append(name, value);
            }
        }
        let bytes = cf_response.bytes().await.map_err(DictionaryError::internal)?;

        let mut response = UpstreamResponse::new(status, Body::from(bytes));
        *response.headers_mut() = response_headers;
        Ok(response)
    }
}

fn http_method_to_cf(method: &Method) -> CfMethod {
    match *method {
        Method::POST => CfMethod::Post,
        Method::PUT => CfMethod::Put,
        Method::PATCH => CfMethod::Patch,
        Method::DELETE => CfMethod::Delete,
        Method::HEAD => CfMethod::Head,
        Method::OPTIONS => CfMethod::Options,
        _ => CfMethod::Get,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    #[wasm_bindgen_test]
    fn maps_methods() {
        assert_eq!(http_method_to_cf(&Method::GET), CfMethod::Get);
        assert_eq!(http_method_to_cf(&Method::HEAD), CfMethod::Head);
        assert_eq!(http_method_to_cf(&Method::TRACE), CfMethod::Get);
    }
}
