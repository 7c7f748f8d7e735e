//! SQL script splitter.
//!
//! Finds the boundaries of the individual commands in a SQL script
//! without parsing SQL. Delimiters inside string literals, line
//! comments, and block comments are ignored. Alternate delimiters such
//! as `GO` or `/` on a line of their own, and single-line commands such
//! as `SET ECHO ON`, are supported.
//!
//! Every command keeps its byte offsets in the script, so an editor can
//! find the statement under the caret and a batch runner can report
//! where a failing statement came from.
//!
//! # Quick start
//!
//! ## Split a script
//!
//! ```
//! use sqlscript_rs::{SplitterConfig, split_str};
//!
//! let commands = split_str("select ';' from t; select 1;", &SplitterConfig::new()).unwrap();
//! assert_eq!(commands.len(), 2);
//! assert_eq!(commands[0].text(), "select ';' from t");
//! ```
//!
//! ## Find the command under the caret
//!
//! ```
//! use sqlscript_rs::{ScriptSplitter, SplitterConfig};
//!
//! let script = "select 1;\n\nselect 2;";
//! let splitter = ScriptSplitter::from_text(script, SplitterConfig::new()).unwrap();
//! assert_eq!(splitter.command_index_at(3), Some(0));
//! assert_eq!(splitter.command_index_at(10), Some(1));
//! ```
//!
//! ## Stream a large file with `GO` batches
//!
//! ```no_run
//! use sqlscript_rs::{CommandStream, DelimiterSpec, SplitterConfig};
//!
//! let config = SplitterConfig::new().delimiter(DelimiterSpec::mssql());
//! for command in CommandStream::from_file("install.sql", "UTF-8", config).unwrap() {
//!     println!("{}", command.unwrap().text());
//! }
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod command;
pub mod delimiter;
pub mod line_command;
pub mod scanner;
pub mod source;
pub mod splitter;

pub use command::{Command, Terminator};
pub use delimiter::{DelimiterError, DelimiterErrorKind, DelimiterSpec};
pub use line_command::{LineCommandKind, SingleLineCommandMatcher};
pub use scanner::{BoundaryScanner, ScannerState, SplitterConfig};
pub use source::{CharSource, Encoding, FileSource, SourceError, StrSource};
pub use splitter::{CommandStream, ScriptSplitter};

/// Unified error type covering sources and delimiters.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading the script failed.
    #[error("{0}")]
    Source(#[from] SourceError),
    /// A delimiter could not be built.
    #[error("{0}")]
    Delimiter(#[from] DelimiterError),
}

/// Split an in-memory script in one step.
pub fn split_str(input: &str, config: &SplitterConfig) -> Result<Vec<Command>, Error> {
    let scanner = BoundaryScanner::new(config.clone());
    let mut source = StrSource::new(input);
    let mut state = ScannerState::new();
    let mut commands = Vec::new();
    while let Some(command) = scanner.next_command(&mut source, &mut state)? {
        commands.push(command);
    }
    Ok(commands)
}
