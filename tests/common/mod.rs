#![allow(dead_code)]

use std::io::Write;

use sqlscript_rs::{Command, SplitterConfig, split_str};

pub fn split(input: &str, config: &SplitterConfig) -> Vec<Command> {
    split_str(input, config).expect("split failed")
}

pub fn texts(input: &str, config: &SplitterConfig) -> Vec<String> {
    split(input, config)
        .into_iter()
        .map(|c| c.text().to_string())
        .collect()
}

/// Write `content` to a fresh temporary script file.
pub fn script_file(content: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(content).expect("write script");
    file.flush().expect("flush script");
    file
}

/// Helper: check ordering and rebuild the input from command spans
/// and the gaps between them.
pub fn assert_offsets_roundtrip(input: &str, commands: &[Command]) {
    let mut rebuilt = String::new();
    let mut pos = 0;
    for (i, command) in commands.iter().enumerate() {
        assert!(
            command.whitespace_start <= command.start && command.start < command.end,
            "command {i} has bad offsets: {command:?}\n--- input ---\n{input}"
        );
        assert!(
            pos <= command.whitespace_start,
            "command {i} overlaps its predecessor: {command:?}\n--- input ---\n{input}"
        );
        rebuilt.push_str(&input[pos..command.whitespace_start]);
        rebuilt.push_str(&input[command.whitespace_start..command.end]);
        pos = command.end;
    }
    rebuilt.push_str(&input[pos..]);
    assert_eq!(rebuilt, input, "offset round-trip mismatch");
}
