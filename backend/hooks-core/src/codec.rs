//! Line encoding used by the Dropbox daemon.
//!
//! Command names and argument fields travel as single lines, so the daemon
//! escapes backslash, newline and tab. Argument lines are tab-separated:
//! the first field is the key, every further field is one value.

use crate::error::protocol::ProtocolError;

use common::ErrorLocation;
use models::Arguments;

use std::panic::Location;

const FIELD_SEPARATOR: char = '\t';
const ESCAPE: char = '\\';

/// Decoding seam between the protocol coroutine and the wire format.
///
/// Implementations run on the session task inside the readiness callback and
/// must not block.
pub trait WireCodec: Send + Sync {
    /// Decode a raw command-name line.
    fn desanitize(&self, raw: &str) -> String;

    /// Parse one argument line into `arguments`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MalformedArgument`] if the line is not a valid
    /// argument line. The caller treats this as fatal to the connection.
    fn parse_argument(&self, line: &str, arguments: &mut Arguments) -> Result<(), ProtocolError>;
}

/// The daemon's own encoding: backslash escapes, tab-separated fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TabSeparatedCodec;

impl TabSeparatedCodec {
    /// Escape `value` so it fits on one line and inside one field.
    pub fn sanitize(value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        for ch in value.chars() {
            match ch {
                ESCAPE => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                FIELD_SEPARATOR => out.push_str("\\t"),
                other => out.push(other),
            }
        }
        out
    }

    /// Undo [`TabSeparatedCodec::sanitize`]. Unknown escapes and a trailing
    /// backslash are kept as written.
    pub fn unescape(value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        let mut chars = value.chars();
        while let Some(ch) = chars.next() {
            if ch != ESCAPE {
                out.push(ch);
                continue;
            }
            match chars.next() {
                Some(ESCAPE) => out.push(ESCAPE),
                Some('n') => out.push('\n'),
                Some('t') => out.push(FIELD_SEPARATOR),
                Some(other) => {
                    out.push(ESCAPE);
                    out.push(other);
                }
                None => out.push(ESCAPE),
            }
        }
        out
    }
}

impl WireCodec for TabSeparatedCodec {
    fn desanitize(&self, raw: &str) -> String {
        Self::unescape(raw)
    }

    fn parse_argument(&self, line: &str, arguments: &mut Arguments) -> Result<(), ProtocolError> {
        let mut fields = line.split(FIELD_SEPARATOR);
        let key = fields.next().unwrap_or_default();
        let values: Vec<String> = fields.map(Self::unescape).collect();

        if values.is_empty() {
            return Err(ProtocolError::MalformedArgument {
                line: line.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        arguments.append(Self::unescape(key), values);
        Ok(())
    }
}
