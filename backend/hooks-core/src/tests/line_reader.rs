use crate::protocol::{LineReader, ReadLine};
use crate::tests::support::{Chunk, ScriptedSource};

use std::io::ErrorKind;

fn expect_line(result: ReadLine) -> String {
    match result {
        ReadLine::Line(line) => line,
        other => panic!("expected a line, got {other:?}"),
    }
}

/// **VALUE**: Verifies that several lines from one read come out one at a time without
/// further reads.
///
/// **BUG THIS CATCHES**: Would catch the reader discarding everything after the first
/// newline of a chunk, or reading again while a whole line is already buffered.
#[test]
fn given_chunk_with_several_lines_when_reading_then_yields_each_from_buffer() {
    // GIVEN: One chunk holding two lines and the start of a third
    let mut reader = LineReader::new();
    let mut source = ScriptedSource::whole(b"first\nsecond\nthi");

    // WHEN / THEN: Both complete lines come back
    assert_eq!(expect_line(reader.try_read_line(&mut source)), "first");
    assert_eq!(expect_line(reader.try_read_line(&mut source)), "second");
    assert_eq!(source.reads, 1, "second line served from the buffer");

    // THEN: The partial third line stays buffered
    assert!(matches!(reader.try_read_line(&mut source), ReadLine::WouldBlock));
    assert_eq!(reader.buffered_len(), 3);
}

/// **VALUE**: Verifies that a line split across readiness events is reassembled.
#[test]
fn given_line_split_across_reads_when_reading_then_reassembled() {
    // GIVEN: "shell_touch" in three pieces with WouldBlock between them
    let mut reader = LineReader::new();
    let mut source = ScriptedSource::new(vec![
        Chunk::Data(b"shell".to_vec()),
        Chunk::WouldBlock,
        Chunk::Data(b"_to".to_vec()),
        Chunk::WouldBlock,
        Chunk::Data(b"uch\n".to_vec()),
    ]);

    // WHEN / THEN: Two suspensions, then the full line
    assert!(matches!(reader.try_read_line(&mut source), ReadLine::WouldBlock));
    assert!(matches!(reader.try_read_line(&mut source), ReadLine::WouldBlock));
    assert_eq!(expect_line(reader.try_read_line(&mut source)), "shell_touch");
    assert_eq!(reader.buffered_len(), 0);
}

/// **VALUE**: Verifies that an interrupted read is retried rather than reported.
#[test]
fn given_interrupted_read_when_reading_then_retries() {
    let mut reader = LineReader::new();
    let mut source = ScriptedSource::new(vec![
        Chunk::Fail(ErrorKind::Interrupted),
        Chunk::Data(b"done\n".to_vec()),
    ]);

    assert_eq!(expect_line(reader.try_read_line(&mut source)), "done");
}

/// **VALUE**: Verifies that end of stream is reported even with an unterminated remainder.
#[test]
fn given_eof_after_partial_line_when_reading_then_reports_eof() {
    let mut reader = LineReader::new();
    let mut source = ScriptedSource::new(vec![Chunk::Data(b"partial".to_vec()), Chunk::Eof]);

    assert!(matches!(reader.try_read_line(&mut source), ReadLine::Eof));
}

/// **VALUE**: Verifies that invalid UTF-8 becomes an InvalidData failure and that the bad
/// line does not poison the buffer.
#[test]
fn given_invalid_utf8_line_when_reading_then_fails_with_invalid_data() {
    // GIVEN: A bad line followed by a good one
    let mut reader = LineReader::new();
    let mut source = ScriptedSource::whole(b"\xc3\x28\nok\n");

    // WHEN: Reading the first line
    let first = reader.try_read_line(&mut source);

    // THEN: InvalidData, and the following line is still intact
    match first {
        ReadLine::Failed(e) => assert_eq!(e.kind(), ErrorKind::InvalidData),
        other => panic!("expected InvalidData, got {other:?}"),
    }
    assert_eq!(expect_line(reader.try_read_line(&mut source)), "ok");
}

/// **VALUE**: Verifies that clearing drops buffered bytes so a new connection starts clean.
///
/// **BUG THIS CATCHES**: Would catch leftovers from a dead connection being glued onto the
/// first line of the next one.
#[test]
fn given_buffered_bytes_when_cleared_then_next_line_starts_fresh() {
    // GIVEN: A partial line in the buffer
    let mut reader = LineReader::new();
    let mut stale = ScriptedSource::whole(b"stale-");
    assert!(matches!(reader.try_read_line(&mut stale), ReadLine::WouldBlock));

    // WHEN: Clearing and reading from a fresh source
    reader.clear();
    let mut fresh = ScriptedSource::whole(b"shell_touch\n");

    // THEN: Only the fresh line comes back
    assert_eq!(expect_line(reader.try_read_line(&mut fresh)), "shell_touch");
}

/// **VALUE**: Verifies the line length cap on both sides of the boundary.
///
/// **BUG THIS CATCHES**: Would catch:
/// - An unterminated line buffering without bound
/// - A line of exactly the limit being rejected
/// - A terminated line over the limit slipping through because it arrived in one chunk
#[test]
fn given_line_length_limit_when_reading_then_enforced_at_boundary() {
    // GIVEN: A reader limited to 8 bytes per line
    let mut reader = LineReader::with_limit(8);

    // WHEN / THEN: Exactly 8 bytes is a line
    let mut exact = ScriptedSource::whole(b"12345678\n");
    assert_eq!(expect_line(reader.try_read_line(&mut exact)), "12345678");

    // WHEN / THEN: 9 bytes with a terminator is rejected
    let mut long = ScriptedSource::whole(b"123456789\nok\n");
    assert!(matches!(
        reader.try_read_line(&mut long),
        ReadLine::TooLong { limit: 8 }
    ));
    assert_eq!(reader.buffered_len(), 0, "buffer discarded");

    // WHEN / THEN: 9 bytes with no terminator is rejected without waiting for more
    let mut unterminated = ScriptedSource::new(vec![
        Chunk::Data(b"12345".to_vec()),
        Chunk::Data(b"6789".to_vec()),
    ]);
    assert!(matches!(
        reader.try_read_line(&mut unterminated),
        ReadLine::TooLong { limit: 8 }
    ));
    assert_eq!(reader.buffered_len(), 0);
}
