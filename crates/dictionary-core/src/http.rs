use std::future::Future;
use std::pin::Pin;

use crate::body::Body;
use crate::error::DictionaryError;

pub use ::http::header;
pub use ::http::request::Builder as RequestBuilder;
pub use ::http::response::Builder as ResponseBuilder;
pub use ::http::{Extensions, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};

pub type Request = ::http::Request<Body>;
pub type Response = ::http::Response<Body>;

/// Boxed future returned by route handlers. Not `Send`, so it can run on single-threaded edge
/// runtimes as well as inside tokio.
pub type HandlerFuture =
    Pin<Box<dyn Future<Output = Result<Response, DictionaryError>> + 'static>>;

pub fn request_builder() -> RequestBuilder {
    ::http::Request::builder()
}

pub fn response_builder() -> ResponseBuilder {
    ::http::Response::builder()
}
