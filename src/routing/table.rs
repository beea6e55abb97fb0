//! Route table module
//!
//! Ordered mapping from (method, path pattern) to handler, built once at
//! startup and read-only afterwards.

use hyper::Method;

use super::pattern::{ParamError, PathParams, PathPattern};
use super::RouteError;

/// Handler signature: captured parameters in, response text out
pub type Handler = fn(&PathParams) -> Result<String, ParamError>;

/// A registered route
pub struct Route {
    pub method: Method,
    pub pattern: PathPattern,
    pub handler: Handler,
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

/// Result of looking up a request in the route table
#[derive(Debug)]
pub enum RouteMatch<'a> {
    Found {
        route: &'a Route,
        params: PathParams,
    },
    /// Path exists under other methods
    MethodNotAllowed { allowed: Vec<Method> },
    NotFound,
}

/// Immutable route table
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Find the first route matching method and path, in registration order
    ///
    /// `HEAD` is served by routes registered for `GET`.
    pub fn find(&self, method: &Method, path: &str) -> RouteMatch<'_> {
        let lookup = if method == Method::HEAD {
            Method::GET
        } else {
            method.clone()
        };

        let mut path_known = false;
        for route in &self.routes {
            let Some(params) = route.pattern.matches(path) else {
                continue;
            };
            if route.method == lookup {
                return RouteMatch::Found { route, params };
            }
            path_known = true;
        }

        if path_known {
            RouteMatch::MethodNotAllowed {
                allowed: self.allowed_methods(path),
            }
        } else {
            RouteMatch::NotFound
        }
    }

    /// Methods accepted for a path, including implied HEAD and OPTIONS
    ///
    /// Empty when no route matches the path.
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let mut allowed: Vec<Method> = Vec::new();
        for route in &self.routes {
            if route.pattern.matches(path).is_none() {
                continue;
            }
            push_unique(&mut allowed, route.method.clone());
            if route.method == Method::GET {
                push_unique(&mut allowed, Method::HEAD);
            }
        }
        if !allowed.is_empty() {
            push_unique(&mut allowed, Method::OPTIONS);
        }
        allowed
    }
}

fn push_unique(methods: &mut Vec<Method>, method: Method) {
    if !methods.contains(&method) {
        methods.push(method);
    }
}

/// Collects routes before freezing them into a `RouteTable`
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    routes: Vec<Route>,
}

impl RouteTableBuilder {
    pub fn route(
        mut self,
        method: Method,
        pattern: &str,
        handler: Handler,
    ) -> Result<Self, RouteError> {
        let pattern = PathPattern::parse(pattern)?;
        if self
            .routes
            .iter()
            .any(|r| r.method == method && r.pattern == pattern)
        {
            return Err(RouteError::DuplicateRoute {
                method: method.to_string(),
                pattern: pattern.to_string(),
            });
        }
        self.routes.push(Route {
            method,
            pattern,
            handler,
        });
        Ok(self)
    }

    pub fn build(self) -> RouteTable {
        RouteTable {
            routes: self.routes,
        }
    }
}
