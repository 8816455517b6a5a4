pub mod chain;
pub mod engine;
pub mod layers;
pub mod pattern;
pub mod route;
pub mod table;

pub use chain::{MiddlewareChain, Next};
pub use engine::{Engine, MatchCursor};
pub use pattern::{RouteMatch, RoutePattern};
pub use route::{MatchedRoute, Route, RouteConfig};
pub use table::RouteTable;
