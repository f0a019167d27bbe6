use crate::Arguments;

/// **VALUE**: Verifies that appending to an existing key accumulates values in order.
///
/// **WHY THIS MATTERS**: The daemon may send several argument lines for the same key;
/// handlers read them as one ordered sequence.
///
/// **BUG THIS CATCHES**: Would catch an `insert` that replaces earlier values instead
/// of extending them.
#[test]
fn given_repeated_key_when_appending_then_values_accumulate_in_order() {
    // GIVEN: An argument map with one value under "path"
    let mut arguments = Arguments::new();
    arguments.append("path", [String::from("/a")]);

    // WHEN: Appending two more values to the same key
    arguments.append("path", [String::from("/b"), String::from("/c")]);

    // THEN: One key holding all three values in arrival order
    assert_eq!(arguments.len(), 1);
    assert_eq!(
        arguments.get("path"),
        Some(&[String::from("/a"), String::from("/b"), String::from("/c")][..])
    );
    assert_eq!(arguments.first("path"), Some("/a"));
}

/// **VALUE**: Verifies lookups of absent keys return `None` rather than empty slices.
///
/// **BUG THIS CATCHES**: Would catch a lookup that inserts defaults, making
/// `contains_key` lie to handlers.
#[test]
fn given_missing_key_when_looking_up_then_returns_none() {
    // GIVEN: An empty argument map
    let arguments = Arguments::new();

    // WHEN / THEN: Every accessor reports absence
    assert!(arguments.get("url").is_none());
    assert!(arguments.first("url").is_none());
    assert!(!arguments.contains_key("url"));
    assert!(arguments.is_empty());
}

/// **VALUE**: Verifies that iteration yields every key once with its full value sequence.
///
/// **BUG THIS CATCHES**: Would catch an iterator that flattens repeated keys into
/// separate entries or drops all but the first value.
#[test]
fn given_several_keys_when_iterating_then_each_key_once_with_all_values() {
    // GIVEN: Two keys, one with two values
    let mut arguments = Arguments::new();
    arguments.append("path", [String::from("/a"), String::from("/b")]);
    arguments.append("url", [String::from("https://www.dropbox.com/")]);

    // WHEN: Iterating (order is unspecified, so sort by key)
    let mut entries: Vec<(&str, &[String])> = arguments.iter().collect();
    entries.sort_by_key(|(key, _)| *key);

    // THEN: One entry per key, values intact
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].0, "path");
    assert_eq!(entries[0].1, ["/a", "/b"]);
    assert_eq!(entries[1].0, "url");
    assert_eq!(entries[1].1, ["https://www.dropbox.com/"]);
}
