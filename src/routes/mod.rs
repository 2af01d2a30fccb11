//! Router Module Index
//!
//! Routing is split by access level. This service only has public endpoints; the
//! credential checks live in the signup service, not in middleware.

/// Routes accessible to all clients.
pub mod public;
