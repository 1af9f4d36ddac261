//! HTTP API exposing the import, query, statistics and maintenance
//! operations to the host and the administrative surface.

pub mod handlers;
pub mod models;
pub mod server;

pub use server::start_http_server;
