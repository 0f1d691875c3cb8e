use dictionary_core::app::App;
use dictionary_core::body::Body;
use dictionary_core::error::DictionaryError;
use dictionary_core::http::{request_builder, Method as CoreMethod, Request, Uri};
use dictionary_core::upstream::UpstreamHandle;
use worker::{Error as WorkerError, Method, Request as CfRequest, Response as CfResponse};

use crate::proxy::FetchUpstreamClient;
use crate::response::from_core_response;

/// Convert a Workers request into a core request, buffering the body.
pub async fn into_core_request(mut req: CfRequest) -> Result<Request, DictionaryError> {
    let method = into_core_method(req.method());
    let url = req
        .url()
        .map_err(|err| DictionaryError::bad_request(format!("invalid URL: {}", err)))?;
    let uri: Uri = url
        .as_str()
        .parse()
        .map_err(|err| DictionaryError::bad_request(format!("invalid URI: {}", err)))?;

    let mut builder = request_builder().method(method).uri(uri);
    for (name, value) in req.headers().entries() {
        builder = builder.header(name.as_str(), value);
    }

    let bytes = req.bytes().await.map_err(DictionaryError::internal)?;
    builder
        .body(Body::from(bytes))
        .map_err(DictionaryError::internal)
}

/// Run `req` through the app, reaching the dictionary API with `fetch`.
pub async fn dispatch(app: &App, req: CfRequest) -> Result<CfResponse, WorkerError> {
    dispatch_with_upstream(app, req, UpstreamHandle::with_client(FetchUpstreamClient)).await
}

pub async fn dispatch_with_upstream(
    app: &App,
    req: CfRequest,
    upstream: UpstreamHandle,
) -> Result<CfResponse, WorkerError> {
    let mut core_request = into_core_request(req)
        .await
        .map_err(dictionary_error_to_worker)?;
    core_request.extensions_mut().insert(upstream);

    let response = app.router().oneshot(core_request).await;
    from_core_response(response).map_err(dictionary_error_to_worker)
}

fn dictionary_error_to_worker(err: DictionaryError) -> WorkerError {
    WorkerError::RustError(err.to_string())
}

fn into_core_method(method: Method) -> CoreMethod {
    CoreMethod::from_bytes(method.as_ref().as_bytes()).unwrap_or(CoreMethod::GET)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    #[wasm_bindgen_test]
    fn maps_known_methods() {
        assert_eq!(into_core_method(Method::Get), CoreMethod::GET);
        assert_eq!(into_core_method(Method::Post), CoreMethod::POST);
    }

    #[wasm_bindgen_test]
    fn unknown_methods_default_to_get() {
        let method = Method::from("FOO".to_string());
        assert_eq!(into_core_method(method), CoreMethod::GET);
    }
}
