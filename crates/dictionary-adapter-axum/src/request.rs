use axum::body::Body as AxumBody;
use axum::http::Request;
use dictionary_core::body::Body;
use dictionary_core::error::DictionaryError;
use dictionary_core::http::Request as CoreRequest;

/// Convert an Axum/Hyper request into a core request, buffering the body.
pub async fn into_core_request(request: Request<AxumBody>) -> Result<CoreRequest, DictionaryError> {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(DictionaryError::internal)?;
    Ok(CoreRequest::from_parts(parts, Body::from_bytes(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dictionary_core::http::Method;

    #[tokio::test]
    async fn converts_request_and_buffers_body() {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/dictionary/hello%20world?x=1")
            .header("x-test", "1")
            .body(AxumBody::from("payload"))
            .expect("request");

        let core_request = into_core_request(request)
            .await
            .expect("request conversion");
        assert_eq!(core_request.method(), &Method::GET);
        assert_eq!(core_request.uri().path(), "/dictionary/hello%20world");
        assert_eq!(core_request.headers()["x-test"], "1");
        assert_eq!(core_request.body().as_bytes(), b"payload");
    }

    #[tokio::test]
    async fn empty_body_stays_empty() {
        let request = Request::builder()
            .uri("/")
            .body(AxumBody::empty())
            .expect("request");
        let core_request = into_core_request(request)
            .await
            .expect("request conversion");
        assert!(core_request.body().is_empty());
    }
}
