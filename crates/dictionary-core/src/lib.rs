//! Core primitives for the dictionary front end: a small router, the upstream client seam and the
//! lookup proxy shared by the HTTP server and the Workers deployment.

pub mod app;
pub mod body;
pub mod context;
pub mod error;
pub mod handler;
pub mod http;
pub mod lookup;
pub mod manifest;
pub mod middleware;
pub mod page;
pub mod params;
pub mod response;
pub mod router;
pub mod upstream;

mod handlers;

pub use app::{App, DictionaryApp, Hooks};
pub use lookup::{LookupOutcome, LookupProxy, LookupSettings};
