//! Cloudflare Workers host for the dictionary front end.

mod logger;

#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
mod proxy;
#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
mod request;
#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
mod response;

pub use logger::{build_dispatch, init_logger};

#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
pub use proxy::FetchUpstreamClient;
#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
pub use request::{dispatch, dispatch_with_upstream, into_core_request};
#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
pub use response::from_core_response;

use dictionary_core::app::{App, Hooks};
use dictionary_core::error::DictionaryError;
use dictionary_core::manifest::ManifestLoader;

/// Manifest compiled into the Worker.
pub const MANIFEST: &str = include_str!("../../../dictionary.toml");

/// Parse `manifest_src`, install the Worker logger and build `A`.
pub fn load_app<A: Hooks>(manifest_src: &str) -> Result<App, DictionaryError> {
    let loader = ManifestLoader::load_from_str(manifest_src).map_err(DictionaryError::internal)?;
    let manifest = loader.manifest();
    // A warm isolate already has its logger.
    init_logger(&manifest.logging_or_default("cloudflare")).ok();
    A::build_app(manifest)
}

#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
mod entry {
    use dictionary_core::app::App;
    use dictionary_core::DictionaryApp;
    use once_cell::sync::OnceCell;
    use worker::{event, Context, Env, Error, Request, Response, Result};

    static APP: OnceCell<App> = OnceCell::new();

    #[event(fetch)]
    async fn fetch(req: Request, _env: Env, _ctx: Context) -> Result<Response> {
        let app = APP
            .get_or_try_init(|| super::load_app::<DictionaryApp>(super::MANIFEST))
            .map_err(|err| Error::RustError(err.to_string()))?;
        super::dispatch(app, req).await
    }
}
