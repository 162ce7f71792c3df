/// HTTP status codes the server produces.
///
/// Error variants map directly onto the parser's failure modes:
/// - `UriTooLong` (414): start line exceeded `max_request_line_size`
/// - `HeaderFieldsTooLarge` (431): header line or header count over limit
/// - `ContentTooLarge` (413): declared body over `max_body_bytes`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 201 Created
    Created,
    /// 204 No Content
    NoContent,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 413 Content Too Large
    ContentTooLarge,
    /// 414 URI Too Long
    UriTooLong,
    /// 431 Request Header Fields Too Large
    HeaderFieldsTooLarge,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use metronome::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::NoContent => 204,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::ContentTooLarge => 413,
            StatusCode::UriTooLong => 414,
            StatusCode::HeaderFieldsTooLarge => 431,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::NoContent => "No Content",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::ContentTooLarge => "Content Too Large",
            StatusCode::UriTooLong => "URI Too Long",
            StatusCode::HeaderFieldsTooLarge => "Request Header Fields Too Large",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// A complete HTTP response as produced by a handler.
///
/// Carries exactly what the wire format needs: status, content type, body.
/// Content-Length is computed from the body at serialization time.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: StatusCode, content_type: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: content_type.into(),
            body: body.into(),
        }
    }

    /// Creates a 200 OK text/plain response.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(StatusCode::Ok, "text/plain", body)
    }

    /// Creates a 200 OK text/html response.
    pub fn html(body: impl Into<Vec<u8>>) -> Self {
        Self::new(StatusCode::Ok, "text/html", body)
    }

    /// Creates a 404 Not Found response.
    pub fn not_found() -> Self {
        Self::new(StatusCode::NotFound, "text/plain", "Not Found")
    }

    /// Creates a 500 Internal Server Error response.
    pub fn internal_error() -> Self {
        Self::new(StatusCode::InternalServerError, "text/plain", "Internal Server Error")
    }

    /// Serializes the response into wire bytes.
    ///
    /// Renders the status line, the fixed header set (Content-Type then
    /// Content-Length), the separator, and the body. Performs no I/O.
    pub fn serialize(&self) -> Vec<u8> {
        let head = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n\r\n",
            self.status.as_u16(),
            self.status.reason_phrase(),
            self.content_type,
            self.body.len(),
        );

        let mut buf = Vec::with_capacity(head.len() + self.body.len());
        buf.extend_from_slice(head.as_bytes());
        buf.extend_from_slice(&self.body);
        buf
    }
}
