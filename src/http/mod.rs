//! The HTTP value model owned by the routing core.
//!
//! Transport framing belongs to the hosting runtime (see
//! [`crate::adapters`]); these types are deliberately small, synchronous
//! values that the dispatch engine and handlers pass around by reference.
pub mod caching;
pub mod method;
pub mod request;
pub mod response;
pub mod status;

pub use method::Method;
pub use request::Request;
pub use response::Response;
