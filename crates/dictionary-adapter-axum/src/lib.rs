//! Axum host for the dictionary front end.

mod proxy;
mod request;
mod response;
mod server;
mod service;

pub use proxy::ReqwestUpstreamClient;
pub use request::into_core_request;
pub use response::into_axum_response;
pub use server::{run_app, DictionaryServer, DictionaryServerConfig, PORT_ENV};
pub use service::DictionaryAxumService;
