use crate::http::Request;
use crate::params::PathParams;
use crate::upstream::UpstreamHandle;

/// Request context exposed to handlers and middleware.
pub struct RequestContext {
    request: Request,
    path_params: PathParams,
}

impl RequestContext {
    pub fn new(request: Request, params: PathParams) -> Self {
        Self {
            request,
            path_params: params,
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn path_params(&self) -> &PathParams {
        &self.path_params
    }

    /// Upstream client attached by the hosting adapter, if any.
    pub fn upstream_handle(&self) -> Option<UpstreamHandle> {
        self.request.extensions().get::<UpstreamHandle>().cloned()
    }
}
