use bytes::{Buf, BytesMut};
use std::collections::HashMap;

use crate::http::request::{Method, Request};
use crate::http::response::StatusCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    MalformedRequestLine,
    MalformedHeader,
    MalformedContentLength,
    RequestLineTooLong,
    HeaderTooLong,
    TooManyHeaders,
    BodyTooLarge,
}

impl ParseError {
    /// Status code for the synthesized error response.
    pub fn status(&self) -> StatusCode {
        match self {
            ParseError::MalformedRequestLine
            | ParseError::MalformedHeader
            | ParseError::MalformedContentLength => StatusCode::BadRequest,
            ParseError::RequestLineTooLong => StatusCode::UriTooLong,
            ParseError::HeaderTooLong | ParseError::TooManyHeaders => {
                StatusCode::HeaderFieldsTooLarge
            }
            ParseError::BodyTooLarge => StatusCode::ContentTooLarge,
        }
    }
}

/// What the parser got out of the bytes available so far.
#[derive(Debug)]
pub enum Progress {
    /// Request incomplete; feed more bytes on a later step.
    NeedMore,
    /// The full request is available.
    Complete(Request),
}

/// Size limits the parser enforces while accumulating.
#[derive(Debug, Clone, Copy)]
pub struct ParserLimits {
    /// Per-line cap, applied to the start line and to each header line.
    pub max_request_line_size: usize,
    pub max_header_count: usize,
    pub max_body_bytes: usize,
}

#[derive(Debug)]
enum ParseState {
    RequestLine,
    Headers,
    Body { remaining: usize },
    Complete,
}

/// Incremental HTTP/1.1 request parser.
///
/// Consumes whatever is buffered on each `advance` call and accumulates
/// across calls, so a request may arrive one byte per step. Size caps are
/// checked on every accumulation, never after the fact, so memory use can
/// not grow past the configured limits no matter how slowly bytes arrive.
pub struct RequestParser {
    state: ParseState,
    limits: ParserLimits,
    line: Vec<u8>,
    header_count: usize,
    method: Option<Method>,
    path: String,
    query: String,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl RequestParser {
    pub fn new(limits: ParserLimits) -> Self {
        Self {
            state: ParseState::RequestLine,
            limits,
            line: Vec::new(),
            header_count: 0,
            method: None,
            path: String::new(),
            query: String::new(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Consumes bytes from `buf` and advances the state machine.
    ///
    /// Work per call is bounded by `buf.len()`, which the channel caps at
    /// its chunk size. Errors are terminal; the caller must not feed the
    /// parser again after one.
    pub fn advance(&mut self, buf: &mut BytesMut) -> Result<Progress, ParseError> {
        loop {
            match self.state {
                ParseState::RequestLine => {
                    match self.take_line(buf, ParseError::RequestLineTooLong)? {
                        Some(line) => self.parse_request_line(&line)?,
                        None => return Ok(Progress::NeedMore),
                    }
                }

                ParseState::Headers => match self.take_line(buf, ParseError::HeaderTooLong)? {
                    Some(line) if line.is_empty() => self.finish_headers()?,
                    Some(line) => self.parse_header_line(&line)?,
                    None => return Ok(Progress::NeedMore),
                },

                ParseState::Body { remaining } => {
                    let take = remaining.min(buf.len());
                    self.body.extend_from_slice(&buf[..take]);
                    buf.advance(take);

                    let left = remaining - take;
                    if left > 0 {
                        self.state = ParseState::Body { remaining: left };
                        return Ok(Progress::NeedMore);
                    }
                    self.state = ParseState::Complete;
                }

                ParseState::Complete => return Ok(Progress::Complete(self.take_request())),
            }
        }
    }

    /// Moves buffered bytes into the line accumulator until a `\n` is seen,
    /// enforcing the per-line cap on the unterminated accumulation. Returns
    /// the completed line with the terminator (and any trailing `\r`)
    /// stripped, or `None` if the line is still incomplete.
    fn take_line(
        &mut self,
        buf: &mut BytesMut,
        overflow: ParseError,
    ) -> Result<Option<Vec<u8>>, ParseError> {
        if let Some(pos) = buf.iter().position(|&b| b == b'\n') {
            self.line.extend_from_slice(&buf[..pos]);
            buf.advance(pos + 1);

            let mut line = std::mem::take(&mut self.line);
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if line.len() > self.limits.max_request_line_size {
                return Err(overflow);
            }
            return Ok(Some(line));
        }

        // Line terminator not seen yet; a pending `\r` gets a one-byte
        // allowance since it will be stripped with the terminator.
        let mut accumulated = self.line.len() + buf.len();
        let trailing = buf.last().or(self.line.last());
        if trailing == Some(&b'\r') {
            accumulated -= 1;
        }
        if accumulated > self.limits.max_request_line_size {
            return Err(overflow);
        }
        self.line.extend_from_slice(buf);
        buf.clear();
        Ok(None)
    }

    fn parse_request_line(&mut self, line: &[u8]) -> Result<(), ParseError> {
        let line = std::str::from_utf8(line).map_err(|_| ParseError::MalformedRequestLine)?;

        let mut parts = line.splitn(3, ' ');
        let method = parts.next().ok_or(ParseError::MalformedRequestLine)?;
        let target = parts.next().ok_or(ParseError::MalformedRequestLine)?;
        let _version = parts.next().ok_or(ParseError::MalformedRequestLine)?;

        self.method =
            Some(Method::from_token(method).ok_or(ParseError::MalformedRequestLine)?);
        match target.split_once('?') {
            Some((path, query)) => {
                self.path = path.to_string();
                self.query = query.to_string();
            }
            None => self.path = target.to_string(),
        }

        self.state = ParseState::Headers;
        Ok(())
    }

    fn parse_header_line(&mut self, line: &[u8]) -> Result<(), ParseError> {
        self.header_count += 1;
        if self.header_count > self.limits.max_header_count {
            return Err(ParseError::TooManyHeaders);
        }

        let line = std::str::from_utf8(line).map_err(|_| ParseError::MalformedHeader)?;
        let (name, value) = line.split_once(':').ok_or(ParseError::MalformedHeader)?;
        self.headers
            .insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        Ok(())
    }

    /// Decides between body accumulation and completion once the blank line
    /// ends the header block. The body cap is checked against the declared
    /// length before a single body byte is buffered.
    fn finish_headers(&mut self) -> Result<(), ParseError> {
        let content_length = match self.headers.get("content-length") {
            Some(v) => v
                .parse::<usize>()
                .map_err(|_| ParseError::MalformedContentLength)?,
            None => 0,
        };

        if content_length > self.limits.max_body_bytes {
            return Err(ParseError::BodyTooLarge);
        }

        self.state = if content_length > 0 {
            ParseState::Body {
                remaining: content_length,
            }
        } else {
            ParseState::Complete
        };
        Ok(())
    }

    fn take_request(&mut self) -> Request {
        Request {
            method: self.method.take().unwrap_or(Method::GET),
            path: std::mem::take(&mut self.path),
            query: std::mem::take(&mut self.query),
            headers: std::mem::take(&mut self.headers),
            body: std::mem::take(&mut self.body),
        }
    }
}
