//! Routing module
//!
//! Provides the startup-built route table:
//! - Path patterns with named parameters (`/items/{id}`)
//! - Ordered (method, pattern) → handler lookup
//! - Allowed-method discovery for 405 and OPTIONS responses

mod pattern;
mod table;

use std::fmt;

pub use pattern::{ParamError, PathParams, PathPattern};
pub use table::{RouteMatch, RouteTable};

/// Error raised while building the route table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    MissingLeadingSlash(String),
    EmptyParamName(String),
    UnbalancedBrace(String),
    DuplicateParam { pattern: String, name: String },
    DuplicateRoute { method: String, pattern: String },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLeadingSlash(p) => write!(f, "route pattern '{p}' must start with '/'"),
            Self::EmptyParamName(p) => write!(f, "route pattern '{p}' has an empty parameter name"),
            Self::UnbalancedBrace(p) => write!(f, "route pattern '{p}' has unbalanced braces"),
            Self::DuplicateParam { pattern, name } => {
                write!(f, "route pattern '{pattern}' declares parameter '{name}' twice")
            }
            Self::DuplicateRoute { method, pattern } => {
                write!(f, "route {method} {pattern} is already registered")
            }
        }
    }
}

impl std::error::Error for RouteError {}
