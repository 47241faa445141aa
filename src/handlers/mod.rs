// Handlers by security tier:
// public    - no session required
// protected - authoritative session required (API: 401, pages: redirect)

pub mod protected;
pub mod public;
