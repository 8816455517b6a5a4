//! I/O adapters around the synchronous routing core.
pub mod http_server;

pub use http_server::serve;
