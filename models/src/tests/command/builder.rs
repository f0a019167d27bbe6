use crate::{Arguments, CommandBuilder, ModelError};

/// **VALUE**: Verifies that a builder with a name and arguments yields the same command shape
/// the parser produces.
///
/// **WHY THIS MATTERS**: Handler tests build commands by hand; if the builder diverged from
/// the parser's output, those tests would exercise a shape that never arrives on the wire.
#[test]
fn given_name_and_arguments_when_building_then_returns_command() {
    // GIVEN: A builder for a launch_url command
    let builder = CommandBuilder::default()
        .with_name("launch_url")
        .with_argument("url", "https://www.dropbox.com/");

    // WHEN: Building
    let command = builder.build().expect("valid command");

    // THEN: Name and first argument survive
    assert_eq!(command.name(), "launch_url");
    assert_eq!(
        command.first_argument("url"),
        Some("https://www.dropbox.com/")
    );
}

/// **VALUE**: Verifies that the builder rejects a missing name.
///
/// **BUG THIS CATCHES**: Would catch a builder that silently defaults the name to "",
/// producing commands that can never be dispatched.
#[test]
fn given_missing_name_when_building_then_returns_validation_error() {
    // GIVEN: A builder without a name
    let builder = CommandBuilder::default().with_argument("path", "/tmp");

    // WHEN: Building
    let result = builder.build();

    // THEN: Validation error naming the missing field
    match result {
        Err(ModelError::Validation { message, .. }) => {
            assert_eq!(message, "Command name is required");
        }
        Ok(command) => panic!("expected validation error, got {command:?}"),
    }
}

/// **VALUE**: Verifies that the builder rejects an empty name.
#[test]
fn given_empty_name_when_building_then_returns_validation_error() {
    // GIVEN: A builder with an empty name
    let builder = CommandBuilder::default().with_name("");

    // WHEN: Building
    let result = builder.build();

    // THEN: Validation error
    assert!(matches!(result, Err(ModelError::Validation { .. })));
}

/// **VALUE**: Verifies that a prepared argument map is carried into the command whole,
/// and that later `with_argument` calls extend it.
///
/// **BUG THIS CATCHES**: Would catch `with_arguments` merging into a fresh map and losing
/// repeated values, or a later `with_argument` replacing the map.
#[test]
fn given_prepared_arguments_when_building_then_command_carries_them() {
    // GIVEN: An argument map with a repeated key
    let mut arguments = Arguments::new();
    arguments.append("path", [String::from("/a"), String::from("/b")]);

    // WHEN: Building with that map plus one more argument
    let command = CommandBuilder::default()
        .with_name("shell_touch")
        .with_arguments(arguments.clone())
        .with_argument("path", "/c")
        .build()
        .expect("valid command");

    // THEN: All three values in order
    assert_eq!(
        command.arguments().get("path"),
        Some(&[String::from("/a"), String::from("/b"), String::from("/c")][..])
    );
    assert_ne!(command.arguments(), &arguments);
}
