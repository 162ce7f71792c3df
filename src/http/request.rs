use std::collections::HashMap;

/// HTTP request methods.
///
/// Method tokens are matched case-insensitively when parsing, so `get` and
/// `GET` dispatch to the same route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// OPTIONS - Describe communication options
    OPTIONS,
    /// PATCH - Partial modification of a resource
    PATCH,
}

impl Method {
    /// Parses an HTTP method token, ignoring case.
    ///
    /// # Example
    ///
    /// ```
    /// # use metronome::http::request::Method;
    /// assert_eq!(Method::from_token("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_token("get"), Some(Method::GET));
    /// assert_eq!(Method::from_token("BREW"), None);
    /// ```
    pub fn from_token(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "HEAD" => Some(Method::HEAD),
            "OPTIONS" => Some(Method::OPTIONS),
            "PATCH" => Some(Method::PATCH),
            _ => None,
        }
    }
}

/// A fully parsed HTTP request, immutable once produced.
///
/// The path is not URL-decoded and the query string is passed through raw;
/// interpreting either is left to the handler.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The request path, exactly as sent (e.g. "/index.html")
    pub path: String,
    /// Everything after the first `?` in the request target, or ""
    pub query: String,
    /// Headers with lowercased names and trimmed values
    pub headers: HashMap<String, String>,
    /// Request body, byte-exact
    pub body: Vec<u8>,
}

impl Request {
    /// Retrieves a header value by its lowercase name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|v| v.as_str())
    }
}
