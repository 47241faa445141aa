pub mod auth;
pub mod edge_gate;
pub mod layout_guard;

pub use auth::{session_auth_middleware, AuthUser};
pub use edge_gate::{edge_gate_middleware, GateDecision};
pub use layout_guard::layout_guard_middleware;
