// Handlers behind an authoritative session check.
//
// /api/* routes run behind `session_auth_middleware` (401 on failure);
// /dashboard runs behind `layout_guard_middleware` (redirect on failure).

pub mod dashboard;
pub mod extract;
pub mod user;

pub use dashboard::layout_get as dashboard_layout;
pub use extract::extract_post as extract;
