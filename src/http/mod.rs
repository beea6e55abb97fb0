//! HTTP protocol layer module
//!
//! Provides HTTP response builders, decoupled from routing and handlers.

pub mod response;

// Re-export commonly used types
pub use response::{
    build_400_response, build_404_response, build_405_response, build_413_response,
    build_options_response, build_text_response,
};
