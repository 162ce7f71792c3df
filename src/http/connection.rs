use std::io::{Read, Write};
use std::time::Instant;

use crate::config::Config;
use crate::http::channel::{BufferedChannel, Fill};
use crate::http::parser::{ParserLimits, Progress, RequestParser};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::server::router::Router;

/// Why a connection reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Response fully drained.
    Done,
    /// Deadline exceeded; torn down silently.
    TimedOut,
    /// Peer closed before the request completed.
    PeerClosed,
    /// Hard transport error (reset, broken pipe).
    Errored,
}

/// What one step left the connection in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Still working; step again next tick.
    Active,
    /// Terminal; the engine should drop this connection.
    Finished(CloseReason),
}

enum ConnState {
    Parsing(RequestParser),
    Dispatch(Request),
    Writing,
    Closed(CloseReason),
}

/// One accepted connection and its processing state.
///
/// Mutated exclusively through `step`, which performs at most one fill()
/// or drain() syscall and a bounded amount of parsing, then returns. The
/// deadline is fixed at acceptance and never extended by partial progress.
pub struct Connection<S> {
    channel: BufferedChannel<S>,
    state: ConnState,
    deadline: Instant,
}

impl<S: Read + Write> Connection<S> {
    pub fn new(stream: S, config: &Config, now: Instant) -> Self {
        let limits = ParserLimits {
            max_request_line_size: config.max_request_line_size,
            max_header_count: config.max_header_count,
            max_body_bytes: config.max_body_bytes,
        };
        Self {
            channel: BufferedChannel::new(stream, config.read_chunk_size, config.write_chunk_size),
            state: ConnState::Parsing(RequestParser::new(limits)),
            deadline: now + std::time::Duration::from_secs(config.request_timeout_seconds),
        }
    }

    /// Advances the state machine by one bounded unit of work.
    pub fn step(&mut self, router: &Router, now: Instant) -> Status {
        // The deadline cuts in from any state, even mid-write. No response
        // is attempted; a peer this slow may already be gone.
        if now > self.deadline && !matches!(self.state, ConnState::Closed(_)) {
            self.state = ConnState::Closed(CloseReason::TimedOut);
            return Status::Finished(CloseReason::TimedOut);
        }

        match &mut self.state {
            ConnState::Parsing(_) => self.step_parsing(),
            ConnState::Dispatch(_) => self.step_dispatch(router),
            ConnState::Writing => self.step_writing(),
            ConnState::Closed(reason) => Status::Finished(*reason),
        }
    }

    fn step_parsing(&mut self) -> Status {
        let fill = match self.channel.fill() {
            Ok(f) => f,
            Err(e) => {
                tracing::debug!("transport error while reading: {}", e);
                return self.close(CloseReason::Errored);
            }
        };

        let ConnState::Parsing(parser) = &mut self.state else {
            unreachable!("step_parsing outside Parsing state");
        };

        match parser.advance(self.channel.buffered()) {
            Ok(Progress::Complete(req)) => {
                self.state = ConnState::Dispatch(req);
                Status::Active
            }
            Ok(Progress::NeedMore) => {
                if fill == Fill::Eof {
                    // Peer finished sending but the request never completed.
                    tracing::debug!("peer closed mid-request");
                    return self.close(CloseReason::PeerClosed);
                }
                Status::Active
            }
            Err(e) => {
                tracing::debug!("parse failure: {:?}", e);
                let resp = Response::new(e.status(), "text/plain", e.status().reason_phrase());
                self.send(resp)
            }
        }
    }

    fn step_dispatch(&mut self, router: &Router) -> Status {
        let ConnState::Dispatch(req) = &self.state else {
            unreachable!("step_dispatch outside Dispatch state");
        };

        let resp = match router.dispatch(&req.path, req.method) {
            Some(handler) => match handler(&req.query, &req.headers, &req.body) {
                Ok(resp) => resp,
                Err(e) => {
                    // Handler failures stop at this boundary; the engine
                    // never sees them.
                    tracing::error!("handler failed for {}: {:#}", req.path, e);
                    Response::internal_error()
                }
            },
            None => Response::not_found(),
        };

        tracing::debug!(
            "responding {} with {} body bytes",
            resp.status.as_u16(),
            resp.body.len()
        );
        self.send(resp)
    }

    fn step_writing(&mut self) -> Status {
        match self.channel.drain() {
            Ok(_) => {
                if self.channel.pending() == 0 {
                    self.close(CloseReason::Done)
                } else {
                    Status::Active
                }
            }
            Err(e) => {
                tracing::debug!("transport error while writing: {}", e);
                self.close(CloseReason::Errored)
            }
        }
    }

    /// Serializes the response into the write buffer and enters Writing.
    /// Draining starts on the next step.
    fn send(&mut self, resp: Response) -> Status {
        self.channel.queue(&resp.serialize());
        self.state = ConnState::Writing;
        Status::Active
    }

    fn close(&mut self, reason: CloseReason) -> Status {
        self.state = ConnState::Closed(reason);
        Status::Finished(reason)
    }
}
