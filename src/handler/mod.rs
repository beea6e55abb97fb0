//! Request handler module
//!
//! Responsible for request dispatch and the item endpoints.

pub mod items;
pub mod router;

// Re-export main entry point
pub use router::{build_routes, handle_request};
