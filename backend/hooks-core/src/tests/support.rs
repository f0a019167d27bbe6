// Shared fixtures for unit tests: a scripted byte source and a recording
// dispatch table, so the parser can be driven without sockets.

use crate::dispatch::DispatchTable;
use crate::protocol::ByteSource;
use crate::session::{ConnectionState, SessionCommand, SessionHandle};

use models::Command;

use std::collections::VecDeque;
use std::io::{Error as IoError, ErrorKind};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

pub(crate) enum Chunk {
    Data(Vec<u8>),
    WouldBlock,
    Eof,
    Fail(ErrorKind),
}

/// Replays a fixed sequence of reads. An empty script reports `WouldBlock`.
pub(crate) struct ScriptedSource {
    chunks: VecDeque<Chunk>,
    pub(crate) reads: usize,
}

impl ScriptedSource {
    pub(crate) fn new(chunks: Vec<Chunk>) -> Self {
        Self {
            chunks: chunks.into(),
            reads: 0,
        }
    }

    /// Everything available in one readiness event.
    pub(crate) fn whole(bytes: &[u8]) -> Self {
        Self::new(vec![Chunk::Data(bytes.to_vec())])
    }

    /// One byte per readiness event.
    pub(crate) fn byte_by_byte(bytes: &[u8]) -> Self {
        let chunks = bytes
            .iter()
            .flat_map(|byte| [Chunk::Data(vec![*byte]), Chunk::WouldBlock])
            .collect();
        Self::new(chunks)
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.chunks.is_empty()
    }
}

impl ByteSource for ScriptedSource {
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, IoError> {
        self.reads += 1;
        match self.chunks.pop_front() {
            None | Some(Chunk::WouldBlock) => Err(IoError::from(ErrorKind::WouldBlock)),
            Some(Chunk::Eof) => {
                self.chunks.push_front(Chunk::Eof);
                Ok(0)
            }
            Some(Chunk::Fail(kind)) => Err(IoError::from(kind)),
            Some(Chunk::Data(mut bytes)) => {
                let count = bytes.len().min(buf.len());
                buf[..count].copy_from_slice(&bytes[..count]);
                if count < bytes.len() {
                    self.chunks.push_front(Chunk::Data(bytes.split_off(count)));
                }
                Ok(count)
            }
        }
    }
}

pub(crate) fn detached_session() -> (SessionHandle, UnboundedReceiver<SessionCommand>) {
    let (command_tx, command_rx) = unbounded_channel();
    (
        SessionHandle::new(command_tx, Arc::new(ConnectionState::new())),
        command_rx,
    )
}

pub(crate) type Recorded = Arc<Mutex<Vec<Command>>>;

/// A table whose handlers for `names` record every command they receive.
pub(crate) fn recording_table(names: &[&str]) -> (DispatchTable, Recorded) {
    let recorded: Recorded = Arc::new(Mutex::new(Vec::new()));
    let mut table = DispatchTable::new();
    for name in names {
        let sink = Arc::clone(&recorded);
        table.register(*name, move |_session: &SessionHandle, command: &Command| {
            sink.lock().expect("recording lock").push(command.clone());
        });
    }
    (table, recorded)
}

pub(crate) fn recorded(recorded: &Recorded) -> Vec<Command> {
    recorded.lock().expect("recording lock").clone()
}

/// Command text with `count` distinct `key\tvalue` argument lines.
pub(crate) fn command_with_arguments(name: &str, count: usize) -> String {
    let mut text = format!("{name}\n");
    for index in 0..count {
        text.push_str(&format!("key{index}\tvalue{index}\n"));
    }
    text.push_str("done\n");
    text
}
