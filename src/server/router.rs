use std::collections::HashMap;
use std::fmt;

use crate::http::request::Method;
use crate::http::response::Response;

/// A request handler: (raw query string, headers, body) -> response.
///
/// An `Err` from a handler is contained at the dispatch boundary and turned
/// into a 500 response; it never reaches the engine.
pub type Handler =
    Box<dyn Fn(&str, &HashMap<String, String>, &[u8]) -> anyhow::Result<Response>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    DuplicateRoute { path: String, method: Method },
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::DuplicateRoute { path, method } => {
                write!(f, "route already registered: {method:?} {path}")
            }
        }
    }
}

impl std::error::Error for RouterError {}

/// Exact-match dispatch table from (path, method) to handler.
///
/// Populated once during setup; read-only while serving. Paths match
/// case-sensitively; methods are case-insensitive because tokens are
/// normalized into [`Method`] at parse time.
#[derive(Default)]
pub struct Router {
    routes: HashMap<(String, Method), Handler>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for an exact (path, method) pair.
    ///
    /// Registering the same pair twice is a setup error and fails eagerly,
    /// before serving begins.
    pub fn register(
        &mut self,
        path: impl Into<String>,
        method: Method,
        handler: Handler,
    ) -> Result<(), RouterError> {
        let path = path.into();
        if self.routes.contains_key(&(path.clone(), method)) {
            return Err(RouterError::DuplicateRoute { path, method });
        }
        self.routes.insert((path, method), handler);
        Ok(())
    }

    pub fn dispatch(&self, path: &str, method: Method) -> Option<&Handler> {
        self.routes.get(&(path.to_string(), method))
    }
}
