//! Trait seams between the routing core and user code.
pub mod handler;

pub use handler::{Arg, Handler, HandlerOutcome, handler_fn};
