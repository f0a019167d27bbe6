//! Incremental decoding of the daemon's line protocol.

pub mod coroutine;
pub mod line_reader;

pub use coroutine::{DONE_SENTINEL, ProtocolCoroutine, ResumePoint};
pub use line_reader::{ByteSource, LineReader, MAX_LINE_BYTES, ReadLine};
