//! Resumable parser for the hook command stream.
//!
//! The daemon sends, per command:
//!
//! ```text
//! <command-name>
//! <key>\t<value>[\t<value>...]      (zero or more, at most `max_arguments`)
//! done
//! ```
//!
//! Bytes arrive in arbitrary chunks, so parsing can stop at any line boundary
//! and must pick up from the same point on the next readiness event. All of
//! that state lives in [`ProtocolCoroutine`], which the session keeps for the
//! lifetime of one connection.

use crate::codec::WireCodec;
use crate::dispatch::DispatchTable;
use crate::error::{ConnectionError, HandlerError, HooksError, ProtocolError};
use crate::protocol::line_reader::{ByteSource, LineReader, ReadLine};
use crate::session::SessionHandle;

use common::ErrorLocation;
use models::{Arguments, Command};

use std::any::Any;
use std::io::{Error as IoError, ErrorKind};
use std::mem::take;
use std::panic::{AssertUnwindSafe, Location, catch_unwind};
use std::sync::Arc;

use log::warn;

/// Line that terminates an argument block.
pub const DONE_SENTINEL: &str = "done";

/// Where the parser will pick up on its next invocation.
///
/// Dispatch is not a resume point: a command is dispatched in the same step
/// that reads its `done` line, so the parser never suspends there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumePoint {
    AwaitCommandName,
    AwaitArgumentLine,
}

/// A command whose name has been read but whose argument block is still open.
#[derive(Debug)]
struct PendingCommand {
    name: String,
    arguments: Arguments,
    argument_count: usize,
}

impl PendingCommand {
    fn new(name: String) -> Self {
        Self {
            name,
            arguments: Arguments::new(),
            argument_count: 0,
        }
    }

    fn into_command(self) -> Command {
        Command::new(self.name, self.arguments)
    }
}

/// Name and arguments exist together or not at all: both live inside the
/// [`PendingCommand`] carried by the mid-command states.
#[derive(Debug, Default)]
enum ParseState {
    #[default]
    AwaitCommandName,
    AwaitArgumentLine(PendingCommand),
    Dispatch(PendingCommand),
}

enum Flow {
    Continue,
    Suspend,
    Halt(HooksError),
}

pub struct ProtocolCoroutine {
    state: ParseState,
    reader: LineReader,
    codec: Arc<dyn WireCodec>,
    max_arguments: usize,
}

impl ProtocolCoroutine {
    pub fn new(codec: Arc<dyn WireCodec>, max_arguments: usize) -> Self {
        Self {
            state: ParseState::AwaitCommandName,
            reader: LineReader::new(),
            codec,
            max_arguments,
        }
    }

    pub fn resume_point(&self) -> ResumePoint {
        match self.state {
            ParseState::AwaitCommandName => ResumePoint::AwaitCommandName,
            // Only held inside `step`, never between calls.
            ParseState::AwaitArgumentLine(_) | ParseState::Dispatch(_) => {
                ResumePoint::AwaitArgumentLine
            }
        }
    }

    /// True while a command name has been read and its `done` line has not.
    pub fn has_pending_command(&self) -> bool {
        !matches!(self.state, ParseState::AwaitCommandName)
    }

    /// Readiness callback: consume every complete line `source` can provide
    /// without blocking, dispatching each finished command.
    ///
    /// # Returns
    ///
    /// `Ok(())` once the source reports `WouldBlock`; the parser is suspended
    /// and resumes from the same point on the next call.
    ///
    /// # Errors
    ///
    /// Any error means the connection must be torn down: peer close, read
    /// failure, or a protocol violation. The in-flight command, if any, stays
    /// owned by the parser until [`ProtocolCoroutine::release`].
    pub fn on_readable<S>(
        &mut self,
        source: &mut S,
        table: &DispatchTable,
        session: &SessionHandle,
    ) -> Result<(), HooksError>
    where
        S: ByteSource + ?Sized,
    {
        loop {
            let state = take(&mut self.state);
            let (next, flow) = self.step(state, source, table, session);
            self.state = next;

            match flow {
                Flow::Continue => {}
                Flow::Suspend => return Ok(()),
                Flow::Halt(e) => return Err(e),
            }
        }
    }

    /// Drop any in-flight command and buffered bytes.
    ///
    /// Returns `true` if a partially parsed command was released. Calling it
    /// again is a no-op that returns `false`.
    pub fn release(&mut self) -> bool {
        self.reader.clear();
        !matches!(take(&mut self.state), ParseState::AwaitCommandName)
    }

    fn step<S>(
        &mut self,
        state: ParseState,
        source: &mut S,
        table: &DispatchTable,
        session: &SessionHandle,
    ) -> (ParseState, Flow)
    where
        S: ByteSource + ?Sized,
    {
        match state {
            ParseState::AwaitCommandName => match self.reader.try_read_line(source) {
                ReadLine::Line(line) => {
                    let name = self.codec.desanitize(&line);
                    (
                        ParseState::AwaitArgumentLine(PendingCommand::new(name)),
                        Flow::Continue,
                    )
                }
                ReadLine::WouldBlock => (ParseState::AwaitCommandName, Flow::Suspend),
                ReadLine::Eof => (ParseState::AwaitCommandName, halt(peer_closed())),
                ReadLine::Failed(e) => (ParseState::AwaitCommandName, halt(read_failed(e))),
                ReadLine::TooLong { limit } => {
                    (ParseState::AwaitCommandName, halt(line_too_long(limit)))
                }
            },

            ParseState::AwaitArgumentLine(mut pending) => {
                debug_assert!(pending.argument_count <= self.max_arguments);

                match self.reader.try_read_line(source) {
                    ReadLine::Line(line) if line == DONE_SENTINEL => {
                        (ParseState::Dispatch(pending), Flow::Continue)
                    }
                    ReadLine::Line(line) => {
                        if pending.argument_count >= self.max_arguments {
                            warn!(
                                "Hook '{}' exceeded {} argument lines, dropping connection",
                                pending.name, self.max_arguments
                            );
                            let error = ProtocolError::TooManyArguments {
                                limit: self.max_arguments,
                                location: ErrorLocation::from(Location::caller()),
                            };
                            return (ParseState::AwaitArgumentLine(pending), halt(error));
                        }

                        match self.codec.parse_argument(&line, &mut pending.arguments) {
                            Ok(()) => {
                                pending.argument_count += 1;
                                (ParseState::AwaitArgumentLine(pending), Flow::Continue)
                            }
                            Err(e) => {
                                warn!("Bad argument line for hook '{}': {e}", pending.name);
                                (ParseState::AwaitArgumentLine(pending), halt(e))
                            }
                        }
                    }
                    ReadLine::WouldBlock => (ParseState::AwaitArgumentLine(pending), Flow::Suspend),
                    ReadLine::Eof => (ParseState::AwaitArgumentLine(pending), halt(peer_closed())),
                    ReadLine::Failed(e) => {
                        (ParseState::AwaitArgumentLine(pending), halt(read_failed(e)))
                    }
                    ReadLine::TooLong { limit } => {
                        warn!("Hook '{}' sent an argument line over {limit} bytes", pending.name);
                        (ParseState::AwaitArgumentLine(pending), halt(line_too_long(limit)))
                    }
                }
            }

            ParseState::Dispatch(pending) => {
                let command = pending.into_command();
                match catch_unwind(AssertUnwindSafe(|| table.dispatch(session, &command))) {
                    Ok(_) => (ParseState::AwaitCommandName, Flow::Continue),
                    Err(payload) => (
                        ParseState::AwaitCommandName,
                        halt(handler_panicked(&command, payload.as_ref())),
                    ),
                }
            }
        }
    }
}

fn halt(error: impl Into<HooksError>) -> Flow {
    Flow::Halt(error.into())
}

#[track_caller]
fn peer_closed() -> HooksError {
    ConnectionError::PeerClosed {
        message: String::from("hook socket closed by peer"),
        location: ErrorLocation::from(Location::caller()),
    }
    .into()
}

#[track_caller]
fn line_too_long(limit: usize) -> HooksError {
    ProtocolError::LineTooLong {
        limit,
        location: ErrorLocation::from(Location::caller()),
    }
    .into()
}

#[track_caller]
fn handler_panicked(command: &Command, payload: &(dyn Any + Send)) -> HooksError {
    let message = payload
        .downcast_ref::<&str>()
        .map(|text| text.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| String::from("non-string panic payload"));

    HandlerError::Panicked {
        command: command.name().to_string(),
        message,
        location: ErrorLocation::from(Location::caller()),
    }
    .into()
}

/// Invalid UTF-8 is the peer's fault; anything else is the transport's.
#[track_caller]
fn read_failed(error: IoError) -> HooksError {
    if error.kind() == ErrorKind::InvalidData {
        return ProtocolError::InvalidEncoding {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
        .into();
    }

    ConnectionError::Read {
        message: String::from("hook socket read failed"),
        location: ErrorLocation::from(Location::caller()),
        source: error,
    }
    .into()
}
