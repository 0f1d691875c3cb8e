use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body as AxumBody;
use axum::http::{Request, Response};
use tokio::{runtime::Handle, task};
use tower::Service;

use dictionary_core::response::IntoResponse;
use dictionary_core::router::RouterService;
use dictionary_core::upstream::UpstreamHandle;

use crate::request::into_core_request;
use crate::response::into_axum_response;

/// Tower service that hosts a core router inside Axum/Hyper.
///
/// Every request gets the shared [`UpstreamHandle`] in its extensions before dispatch.
#[derive(Clone)]
pub struct DictionaryAxumService {
    router: RouterService,
    upstream: UpstreamHandle,
}

impl DictionaryAxumService {
    pub fn new(router: RouterService, upstream: UpstreamHandle) -> Self {
        Self { router, upstream }
    }
}

impl Service<Request<AxumBody>> for DictionaryAxumService {
    type Response = Response<AxumBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<AxumBody>) -> Self::Future {
        let router = self.router.clone();
        let upstream = self.upstream.clone();
        Box::pin(async move {
            let mut core_request = match into_core_request(request).await {
                Ok(req) => req,
                Err(err) => {
                    tracing::error!("failed to read request body: {}", err);
                    return Ok(into_axum_response(err.into_response()));
                }
            };
            core_request.extensions_mut().insert(upstream);

            // Core handler futures are not `Send`; drive them to completion on this worker.
            let core_response = task::block_in_place(move || {
                Handle::current().block_on(router.oneshot(core_request))
            });
            Ok(into_axum_response(core_response))
        })
    }
}
