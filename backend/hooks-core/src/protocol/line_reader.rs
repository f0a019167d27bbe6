//! Non-blocking newline framing.

use std::io::{Error as IoError, ErrorKind};

use tokio::net::UnixStream;

const LINE_TERMINATOR: u8 = b'\n';
const READ_CHUNK_SIZE: usize = 4096;

/// Longest line accepted before the peer is treated as misbehaving.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

/// A byte stream that can be drained without blocking.
///
/// `read_available` has `try_read` semantics: `Ok(0)` is end of stream and
/// `ErrorKind::WouldBlock` means nothing is buffered right now.
pub trait ByteSource {
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, IoError>;
}

impl ByteSource for UnixStream {
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, IoError> {
        UnixStream::try_read(self, buf)
    }
}

/// Outcome of a single [`LineReader::try_read_line`] call.
#[derive(Debug)]
pub enum ReadLine {
    /// One complete line, terminator stripped.
    Line(String),
    /// No complete line yet; call again after the next readiness event.
    WouldBlock,
    /// The peer closed the stream. Any unterminated remainder is discarded.
    Eof,
    /// The stream failed, or a line was not valid UTF-8.
    Failed(IoError),
    /// More than `limit` bytes arrived without a terminator. The buffer has
    /// been discarded.
    TooLong { limit: usize },
}

/// Buffers partial input between readiness events and yields whole lines.
#[derive(Debug)]
pub struct LineReader {
    pending: Vec<u8>,
    max_line_bytes: usize,
}

impl Default for LineReader {
    fn default() -> Self {
        Self::with_limit(MAX_LINE_BYTES)
    }
}

impl LineReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// A reader that rejects lines longer than `max_line_bytes`, terminator excluded.
    pub fn with_limit(max_line_bytes: usize) -> Self {
        Self {
            pending: Vec::new(),
            max_line_bytes,
        }
    }

    /// Return the next complete line, reading from `source` only when the
    /// buffer holds no terminator. Never blocks.
    pub fn try_read_line<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> ReadLine {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            if let Some(line) = self.take_buffered_line() {
                return line;
            }

            if self.pending.len() > self.max_line_bytes {
                return self.overflow();
            }

            match source.read_available(&mut chunk) {
                Ok(0) => return ReadLine::Eof,
                Ok(read) => self.pending.extend_from_slice(&chunk[..read]),
                Err(e) if e.kind() == ErrorKind::WouldBlock => return ReadLine::WouldBlock,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return ReadLine::Failed(e),
            }
        }
    }

    /// Bytes received but not yet returned as part of a line.
    pub fn buffered_len(&self) -> usize {
        self.pending.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    fn overflow(&mut self) -> ReadLine {
        self.pending.clear();
        ReadLine::TooLong {
            limit: self.max_line_bytes,
        }
    }

    fn take_buffered_line(&mut self) -> Option<ReadLine> {
        let end = self
            .pending
            .iter()
            .position(|byte| *byte == LINE_TERMINATOR)?;

        if end > self.max_line_bytes {
            return Some(self.overflow());
        }

        let mut raw: Vec<u8> = self.pending.drain(..=end).collect();
        raw.pop();

        Some(match String::from_utf8(raw) {
            Ok(line) => ReadLine::Line(line),
            Err(e) => ReadLine::Failed(IoError::new(ErrorKind::InvalidData, e)),
        })
    }
}
