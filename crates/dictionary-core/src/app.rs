use std::sync::Arc;

use crate::context::RequestContext;
use crate::error::DictionaryError;
use crate::handlers;
use crate::manifest::Manifest;
use crate::middleware::{Cors, RequestLogger};
use crate::page::{render_index, LOOKUP_PREFIX};
use crate::router::RouterService;

/// Lightweight container around a `RouterService` that can be extended via hook implementations.
pub struct App {
    router: RouterService,
    name: String,
}

impl App {
    pub fn with_name<S>(router: RouterService, name: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            router,
            name: name.into(),
        }
    }

    pub fn router(&self) -> &RouterService {
        &self.router
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name<S>(&mut self, name: S)
    where
        S: Into<String>,
    {
        self.name = name.into();
    }

    pub fn into_router(self) -> RouterService {
        self.router
    }
}

/// Trait implemented by applications that can be hosted by an adapter.
pub trait Hooks {
    /// Mutate the freshly constructed application before use. Does nothing by default.
    fn configure(_app: &mut App) {}

    /// Build the router service for the application.
    fn routes(manifest: &Manifest) -> Result<RouterService, DictionaryError>;

    fn name(manifest: &Manifest) -> String {
        manifest.app_name().to_string()
    }

    /// Construct an `App` by wiring the routes and invoking the configuration hook.
    fn build_app(manifest: &Manifest) -> Result<App, DictionaryError>
    where
        Self: Sized,
    {
        let mut app = App::with_name(Self::routes(manifest)?, Self::name(manifest));
        Self::configure(&mut app);
        Ok(app)
    }
}

/// The dictionary front end: the search page plus the lookup proxy route.
pub struct DictionaryApp;

impl Hooks for DictionaryApp {
    fn routes(manifest: &Manifest) -> Result<RouterService, DictionaryError> {
        let settings = Arc::new(
            manifest
                .lookup_settings()
                .map_err(DictionaryError::internal)?,
        );
        let page: Arc<str> = render_index(manifest.app_name(), &settings)?.into();

        let index = move |_ctx: RequestContext| handlers::index(Arc::clone(&page));
        let lookup =
            move |ctx: RequestContext| handlers::lookup(ctx, Arc::clone(&settings));

        Ok(RouterService::builder()
            .middleware(RequestLogger)
            .middleware(Cors)
            .get("/", index.clone())
            .get("/index.html", index)
            .get(LOOKUP_PREFIX, lookup.clone())
            .get(&format!("{}{{*term}}", LOOKUP_PREFIX), lookup)
            .build())
    }
}
