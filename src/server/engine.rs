use std::collections::VecDeque;
use std::io::ErrorKind;
use std::net::{TcpListener, TcpStream};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::http::connection::{Connection, Status};
use crate::server::router::Router;

/// The step-driven server core.
///
/// The caller owns the schedule: each `step()` call does one bounded pass
/// (at most one accept plus one state-machine step per active connection)
/// and returns, leaving room for unrelated work between ticks. There is no
/// blocking "serve forever" entry point.
pub struct Engine {
    listener: TcpListener,
    router: Router,
    config: Config,
    connections: VecDeque<Connection<TcpStream>>,
}

impl Engine {
    /// Takes over an already-bound listener. Binding, backlog tuning, and
    /// any network bootstrap stay with the caller.
    pub fn new(listener: TcpListener, router: Router, config: Config) -> anyhow::Result<Self> {
        config.validate()?;
        listener.set_nonblocking(true)?;
        Ok(Self {
            listener,
            router,
            config,
            connections: VecDeque::new(),
        })
    }

    /// One bounded pass: accept at most one connection, step every
    /// previously active connection once, drop the finished ones.
    ///
    /// Returns the number of connections still active. Per-connection
    /// failures are contained inside this pass and never surface; one bad
    /// or slow peer cannot affect the others or stop the server.
    pub fn step(&mut self) -> usize {
        let now = Instant::now();
        let accepted = self.try_accept(now);

        // Acceptance order, one step each. The freshly accepted connection
        // waits for the next tick.
        for _ in 0..self.connections.len() {
            let Some(mut conn) = self.connections.pop_front() else {
                break;
            };
            match conn.step(&self.router, now) {
                Status::Active => self.connections.push_back(conn),
                Status::Finished(reason) => {
                    debug!("connection finished: {:?}", reason);
                    // Dropping the connection closes the stream and frees
                    // its buffers.
                }
            }
        }

        if let Some(conn) = accepted {
            self.connections.push_back(conn);
        }
        self.connections.len()
    }

    fn try_accept(&mut self, now: Instant) -> Option<Connection<TcpStream>> {
        // Refusing accepts at the cap bounds total memory to
        // max_connections x (read + write buffer).
        if self.connections.len() >= self.config.max_connections {
            return None;
        }

        match self.listener.accept() {
            Ok((stream, peer)) => {
                if let Err(e) = stream.set_nonblocking(true) {
                    warn!("failed to make {} non-blocking: {}", peer, e);
                    return None;
                }
                info!("accepted connection from {}", peer);
                Some(Connection::new(stream, &self.config, now))
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => None,
            Err(e) => {
                warn!("accept failed: {}", e);
                None
            }
        }
    }

    /// Connections currently being serviced.
    pub fn active_connections(&self) -> usize {
        self.connections.len()
    }
}
