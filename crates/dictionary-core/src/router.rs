use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use matchit::Router as PathRouter;
use tower_service::Service;

use crate::context::RequestContext;
use crate::error::DictionaryError;
use crate::handler::{BoxHandler, DynHandler, IntoHandler};
use crate::http::{HandlerFuture, Method, Request, Response};
use crate::middleware::{BoxMiddleware, Middleware, Next};
use crate::params::PathParams;
use crate::response::IntoResponse;

#[derive(Clone, Debug)]
pub struct RouteInfo {
    method: Method,
    path: String,
}

impl RouteInfo {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[derive(Default)]
pub struct RouterBuilder {
    routes: HashMap<Method, PathRouter<BoxHandler>>,
    middlewares: Vec<BoxMiddleware>,
    route_info: Vec<RouteInfo>,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method` on `path` (matchit syntax, e.g. `/dictionary/{*term}`).
    ///
    /// # Panics
    ///
    /// Panics when the path conflicts with an already registered route for the same method.
    pub fn route<H>(mut self, path: &str, method: Method, handler: H) -> Self
    where
        H: IntoHandler,
    {
        self.routes
            .entry(method.clone())
            .or_default()
            .insert(path, handler.into_handler())
            .unwrap_or_else(|err| panic!("duplicate route definition for {}: {}", path, err));
        self.route_info.push(RouteInfo::new(method, path));
        self
    }

    pub fn get<H>(self, path: &str, handler: H) -> Self
    where
        H: IntoHandler,
    {
        self.route(path, Method::GET, handler)
    }

    pub fn middleware<M>(mut self, middleware: M) -> Self
    where
        M: Middleware,
    {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    pub fn build(self) -> RouterService {
        RouterService {
            inner: Arc::new(RouterInner {
                routes: self.routes,
                middlewares: self.middlewares,
                route_index: self.route_info,
            }),
        }
    }
}

#[derive(Clone)]
pub struct RouterService {
    inner: Arc<RouterInner>,
}

impl RouterService {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    pub fn routes(&self) -> Vec<RouteInfo> {
        self.inner.route_index.clone()
    }

    /// Dispatch a single request, rendering any error into a response.
    pub async fn oneshot(&self, request: Request) -> Response {
        match self.inner.dispatch(request).await {
            Ok(response) => response,
            Err(err) => err.into_response(),
        }
    }
}

struct RouterInner {
    routes: HashMap<Method, PathRouter<BoxHandler>>,
    middlewares: Vec<BoxMiddleware>,
    route_index: Vec<RouteInfo>,
}

enum RouteMatch<'a> {
    Found(&'a BoxHandler, PathParams),
    Miss(RouteMiss),
}

impl RouterInner {
    async fn dispatch(&self, request: Request) -> Result<Response, DictionaryError> {
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        // Misses still travel through the middleware chain so they are logged and get the same
        // response headers as matched routes.
        match self.find_route(&method, &path) {
            RouteMatch::Found(handler, params) => {
                let ctx = RequestContext::new(request, params);
                Next::new(&self.middlewares, handler.as_ref()).run(ctx).await
            }
            RouteMatch::Miss(miss) => {
                let ctx = RequestContext::new(request, PathParams::default());
                Next::new(&self.middlewares, &miss).run(ctx).await
            }
        }
    }

    fn find_route(&self, method: &Method, path: &str) -> RouteMatch<'_> {
        if let Some(router) = self.routes.get(method) {
            if let Ok(matched) = router.at(path) {
                let params = PathParams::new(
                    matched
                        .params
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                );
                return RouteMatch::Found(matched.value, params);
            }
        }

        let allowed = self
            .routes
            .iter()
            .filter(|(_, router)| router.at(path).is_ok())
            .map(|(candidate, _)| candidate.clone())
            .collect::<HashSet<_>>();

        if allowed.is_empty() {
            RouteMatch::Miss(RouteMiss::NotFound(path.to_string()))
        } else {
            RouteMatch::Miss(RouteMiss::MethodNotAllowed(
                method.clone(),
                allowed.into_iter().collect(),
            ))
        }
    }
}

/// Terminal handler used when no route matches.
enum RouteMiss {
    NotFound(String),
    MethodNotAllowed(Method, Vec<Method>),
}

impl DynHandler for RouteMiss {
    fn call(&self, _ctx: RequestContext) -> HandlerFuture {
        let err = match self {
            RouteMiss::NotFound(path) => DictionaryError::not_found(path.clone()),
            RouteMiss::MethodNotAllowed(method, allowed) => {
                DictionaryError::method_not_allowed(method, allowed)
            }
        };
        Box::pin(async move { Err(err) })
    }
}

impl Service<Request> for RouterService {
    type Response = Response;
    type Error = DictionaryError;
    type Future = HandlerFuture;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move { inner.dispatch(request).await })
    }
}
