use bytes::{Buf, BytesMut};
use std::io::{self, ErrorKind, Read, Write};

/// Outcome of a single fill() attempt.
///
/// Would-block is not a failure and is distinct from end-of-stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// Buffered this many new bytes (always > 0).
    Read(usize),
    /// No data available right now; try again on a later step.
    WouldBlock,
    /// Peer finished sending; no more bytes will ever arrive.
    Eof,
}

/// Buffered non-blocking I/O over one stream.
///
/// Owns a bounded read buffer filled at most `read_chunk` bytes deep and a
/// write buffer drained at most `write_chunk` bytes per call. Neither
/// operation ever blocks; both tolerate partial completion and leave the
/// remainder for the next step.
pub struct BufferedChannel<S> {
    stream: S,
    read_buf: BytesMut,
    write_buf: BytesMut,
    read_chunk: usize,
    write_chunk: usize,
}

impl<S: Read + Write> BufferedChannel<S> {
    pub fn new(stream: S, read_chunk: usize, write_chunk: usize) -> Self {
        Self {
            stream,
            read_buf: BytesMut::with_capacity(read_chunk),
            write_buf: BytesMut::new(),
            read_chunk,
            write_chunk,
        }
    }

    /// Attempts one non-blocking read into the read buffer's remaining
    /// capacity. Hard I/O errors (reset, broken pipe) are fatal to the
    /// connection; would-block is not.
    pub fn fill(&mut self) -> io::Result<Fill> {
        let room = self.read_chunk.saturating_sub(self.read_buf.len());
        if room == 0 {
            // Parser hasn't consumed the buffer yet; nothing to do.
            return Ok(Fill::WouldBlock);
        }

        let mut chunk = vec![0u8; room];
        match self.stream.read(&mut chunk) {
            Ok(0) => Ok(Fill::Eof),
            Ok(n) => {
                self.read_buf.extend_from_slice(&chunk[..n]);
                Ok(Fill::Read(n))
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::Interrupted => {
                Ok(Fill::WouldBlock)
            }
            Err(e) => Err(e),
        }
    }

    /// Attempts one non-blocking write of buffered-but-unsent bytes.
    ///
    /// Returns the number of bytes accepted by the OS; 0 means would-block.
    /// A short write leaves the unsent remainder buffered for the next call.
    pub fn drain(&mut self) -> io::Result<usize> {
        if self.write_buf.is_empty() {
            return Ok(0);
        }

        let len = self.write_buf.len().min(self.write_chunk);
        match self.stream.write(&self.write_buf[..len]) {
            Ok(0) => Err(io::Error::new(
                ErrorKind::WriteZero,
                "peer stopped accepting bytes",
            )),
            Ok(n) => {
                self.write_buf.advance(n);
                Ok(n)
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::Interrupted => {
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }

    /// Queues bytes for sending on later drain() calls.
    pub fn queue(&mut self, bytes: &[u8]) {
        self.write_buf.extend_from_slice(bytes);
    }

    /// Bytes queued but not yet accepted by the OS.
    pub fn pending(&self) -> usize {
        self.write_buf.len()
    }

    /// Received bytes awaiting the parser. The parser consumes from here.
    pub fn buffered(&mut self) -> &mut BytesMut {
        &mut self.read_buf
    }
}
