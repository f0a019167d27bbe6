pub mod arguments;
pub mod builder;

use crate::Arguments;

use serde::Serialize;

/// A fully parsed hook command.
///
/// Built incrementally by the protocol parser and handed to exactly one
/// handler invocation as a shared borrow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    name: String,
    arguments: Arguments,
}

impl Command {
    pub fn new(name: impl Into<String>, arguments: Arguments) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// First value of `key`, the form every built-in handler consumes.
    pub fn first_argument(&self, key: &str) -> Option<&str> {
        self.arguments.first(key)
    }
}
