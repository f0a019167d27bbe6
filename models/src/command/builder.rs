use crate::error::model_error::ModelError;
use crate::{Arguments, Command, ErrorLocation};

use std::panic::Location;

/// Builder for hand-constructed commands (handler tests, host-side fixtures).
///
/// The wire parser does not go through this builder: the daemon may send an
/// empty command name, which simply matches no handler.
#[derive(Debug, Default)]
pub struct CommandBuilder {
    name: Option<String>,
    arguments: Arguments,
}

impl CommandBuilder {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_argument(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.arguments.append(key, [value.into()]);
        self
    }

    pub fn with_arguments(mut self, arguments: Arguments) -> Self {
        self.arguments = arguments;
        self
    }

    /// Build the Command with validation.
    #[track_caller]
    pub fn build(self) -> Result<Command, ModelError> {
        let name = self.name.ok_or_else(|| ModelError::Validation {
            message: String::from("Command name is required"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if name.is_empty() {
            return Err(ModelError::Validation {
                message: String::from("Command name cannot be empty"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Command::new(name, self.arguments))
    }
}
