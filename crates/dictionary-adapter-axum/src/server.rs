use std::net::{SocketAddr, TcpListener as StdTcpListener};

use anyhow::Context;
use axum::Router;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use tokio::runtime::Builder as RuntimeBuilder;
use tokio::signal;
use tower::{service_fn, Service};

use dictionary_core::app::Hooks;
use dictionary_core::manifest::{ManifestLoader, ResolvedLoggingConfig, DEFAULT_PORT};
use dictionary_core::router::RouterService;
use dictionary_core::upstream::UpstreamHandle;

use crate::proxy::ReqwestUpstreamClient;
use crate::service::DictionaryAxumService;

/// Environment variable that overrides the configured listen port.
pub const PORT_ENV: &str = "PORT";

#[derive(Clone, Debug)]
pub struct DictionaryServerConfig {
    pub addr: SocketAddr,
    pub enable_ctrl_c: bool,
}

impl Default for DictionaryServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            enable_ctrl_c: true,
        }
    }
}

/// Blocking HTTP server hosting a core router.
pub struct DictionaryServer {
    router: RouterService,
    upstream: UpstreamHandle,
    config: DictionaryServerConfig,
}

impl DictionaryServer {
    pub fn new(router: RouterService, upstream: UpstreamHandle) -> Self {
        Self::with_config(router, upstream, DictionaryServerConfig::default())
    }

    pub fn with_config(
        router: RouterService,
        upstream: UpstreamHandle,
        config: DictionaryServerConfig,
    ) -> Self {
        Self {
            router,
            upstream,
            config,
        }
    }

    pub fn run(self) -> anyhow::Result<()> {
        let runtime = RuntimeBuilder::new_multi_thread()
            .enable_all()
            .build()
            .context("failed to build tokio runtime")?;

        runtime.block_on(async move { self.run_async().await })
    }

    async fn run_async(self) -> anyhow::Result<()> {
        let listener = StdTcpListener::bind(self.config.addr)
            .with_context(|| format!("failed to bind server to {}", self.config.addr))?;
        listener
            .set_nonblocking(true)
            .context("failed to set listener to non-blocking")?;

        let listener = tokio::net::TcpListener::from_std(listener)
            .context("failed to adopt std listener into tokio")?;

        self.run_with_listener(listener).await
    }

    /// Serve on an already bound listener. Requires a multi-threaded tokio runtime.
    pub async fn run_with_listener(self, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
        let DictionaryServer {
            router,
            upstream,
            config,
        } = self;
        let port = listener
            .local_addr()
            .context("listener has no local address")?
            .port();
        log::info!("Server running on port {}", port);
        serve_with_listener(router, upstream, listener, config.enable_ctrl_c).await
    }
}

async fn serve_with_listener(
    router: RouterService,
    upstream: UpstreamHandle,
    listener: tokio::net::TcpListener,
    enable_ctrl_c: bool,
) -> anyhow::Result<()> {
    let service = DictionaryAxumService::new(router, upstream);
    let router = Router::new().fallback_service(service_fn(move |req| {
        let mut svc = service.clone();
        async move { svc.call(req).await }
    }));

    let server = axum::serve(listener, router);
    if enable_ctrl_c {
        server
            .with_graceful_shutdown(async {
                let _ = signal::ctrl_c().await;
                log::info!("shutting down");
            })
            .await
            .context("axum server error")?;
    } else {
        server.await.context("axum server error")?;
    }

    Ok(())
}

/// Initialise logging, resolve the listen address and serve `A` until Ctrl-C.
pub fn run_app<A: Hooks>(loader: &ManifestLoader) -> anyhow::Result<()> {
    let manifest = loader.manifest();
    init_logger(&manifest.logging_or_default("axum"));

    let port = port_override(std::env::var(PORT_ENV).ok().as_deref())?;
    let addr = manifest.server_addr(port)?;

    let app = A::build_app(manifest)?;
    let upstream = UpstreamHandle::with_client(ReqwestUpstreamClient::try_new()?);

    let config = DictionaryServerConfig {
        addr,
        enable_ctrl_c: true,
    };
    DictionaryServer::with_config(app.into_router(), upstream, config).run()
}

fn init_logger(logging: &ResolvedLoggingConfig) {
    let level = if logging.echo_stdout {
        LevelFilter::from(logging.level)
    } else {
        LevelFilter::Off
    };
    SimpleLogger::new().with_level(level).init().ok();
}

/// Parse the `PORT` override. Unset or blank means "use the manifest".
fn port_override(value: Option<&str>) -> anyhow::Result<Option<u16>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<u16>()
            .map(Some)
            .with_context(|| format!("{} must be a port number, got `{}`", PORT_ENV, raw)),
    }
}
