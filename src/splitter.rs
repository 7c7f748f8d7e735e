use std::fmt;
use std::path::Path;

use crate::Error;
use crate::command::Command;
use crate::scanner::{BoundaryScanner, ScannerState, SplitterConfig};
use crate::source::{CharSource, FileSource, SourceError, StrSource};

/// Splits a whole script up front and answers cursor lookups.
///
/// Suited to editor buffers: every command and its offsets are kept,
/// so [`command_index_at`](Self::command_index_at) is a binary search.
/// The source is released by [`done`](Self::done) or on drop.
pub struct ScriptSplitter {
    source: Box<dyn CharSource>,
    scanner: BoundaryScanner,
    commands: Vec<Command>,
}

impl ScriptSplitter {
    /// Split an in-memory script.
    pub fn from_text(text: impl Into<String>, config: SplitterConfig) -> Result<Self, Error> {
        Self::from_source(Box::new(StrSource::new(text)), config)
    }

    /// Split a script file read with the named encoding.
    pub fn from_file(
        path: impl AsRef<Path>,
        encoding: &str,
        config: SplitterConfig,
    ) -> Result<Self, Error> {
        let source = FileSource::open(path, encoding)?;
        Self::from_source(Box::new(source), config)
    }

    /// Split any character source.
    pub fn from_source(source: Box<dyn CharSource>, config: SplitterConfig) -> Result<Self, Error> {
        let mut splitter = Self {
            source,
            scanner: BoundaryScanner::new(config),
            commands: Vec::new(),
        };
        splitter.scan_all()?;
        Ok(splitter)
    }

    fn scan_all(&mut self) -> Result<(), SourceError> {
        self.commands.clear();
        let mut state = ScannerState::new();
        while let Some(command) = self
            .scanner
            .next_command(self.source.as_mut(), &mut state)?
        {
            self.commands.push(command);
        }
        tracing::debug!(
            commands = self.commands.len(),
            len = self.source.len(),
            "script split"
        );
        Ok(())
    }

    #[must_use]
    pub const fn config(&self) -> &SplitterConfig {
        self.scanner.config()
    }

    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn command(&self, index: usize) -> Option<&Command> {
        self.commands.get(index)
    }

    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Text of command `index`, read back from the source when the
    /// splitter was configured for offsets only. `None` for an index
    /// past the last command.
    pub fn command_text(&mut self, index: usize) -> Result<Option<String>, Error> {
        let Some(command) = self.commands.get(index) else {
            return Ok(None);
        };
        if let Some(text) = &command.text {
            return Ok(Some(text.clone()));
        }
        let start = self.scanner.text_start(command);
        let end = command.end;
        Ok(Some(self.source.slice(start, end)?))
    }

    /// Index of the command under `offset`.
    ///
    /// An offset inside a command, or right after its last byte, selects
    /// that command. An offset in whitespace or comments between two
    /// commands selects the following one. `None` when the offset lies
    /// after the last command.
    #[must_use]
    pub fn command_index_at(&self, offset: usize) -> Option<usize> {
        let index = self.commands.partition_point(|c| c.end < offset);
        (index < self.commands.len()).then_some(index)
    }

    /// Scan again from the beginning, re-using the open source.
    pub fn reset(&mut self) -> Result<(), Error> {
        tracing::debug!("rescanning script");
        self.scan_all()?;
        Ok(())
    }

    /// Release the source.
    pub fn done(mut self) {
        tracing::debug!(commands = self.commands.len(), "splitter done");
        self.source.dispose();
    }
}

impl Drop for ScriptSplitter {
    fn drop(&mut self) {
        self.source.dispose();
    }
}

impl fmt::Debug for ScriptSplitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptSplitter")
            .field("len", &self.source.len())
            .field("scanner", &self.scanner)
            .field("commands", &self.commands)
            .finish()
    }
}

/// Forward-only stream of commands.
///
/// Suited to batch execution of large script files: only the scan
/// state and the next command are held in memory. There is no cursor
/// lookup. The source is released by [`done`](Self::done) or on drop.
pub struct CommandStream {
    source: Box<dyn CharSource>,
    scanner: BoundaryScanner,
    state: ScannerState,
    peeked: Option<Command>,
}

impl CommandStream {
    /// Stream commands from an in-memory script.
    #[must_use]
    pub fn from_text(text: impl Into<String>, config: SplitterConfig) -> Self {
        Self::from_source(Box::new(StrSource::new(text)), config)
    }

    /// Stream commands from a script file read with the named encoding.
    pub fn from_file(
        path: impl AsRef<Path>,
        encoding: &str,
        config: SplitterConfig,
    ) -> Result<Self, Error> {
        let source = FileSource::open(path, encoding)?;
        Ok(Self::from_source(Box::new(source), config))
    }

    #[must_use]
    pub fn from_source(source: Box<dyn CharSource>, config: SplitterConfig) -> Self {
        Self {
            source,
            scanner: BoundaryScanner::new(config),
            state: ScannerState::new(),
            peeked: None,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &SplitterConfig {
        self.scanner.config()
    }

    /// Whether another command follows. Scans ahead by one command.
    pub fn has_next(&mut self) -> Result<bool, Error> {
        if self.peeked.is_none() {
            self.peeked = self.advance()?;
        }
        Ok(self.peeked.is_some())
    }

    /// Byte offset the scan has reached.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.state.cursor()
    }

    /// Rewind to the beginning of the script, re-using the open source.
    pub fn reset(&mut self) {
        tracing::debug!("rewinding command stream");
        self.state = ScannerState::new();
        self.peeked = None;
    }

    /// Release the source.
    pub fn done(mut self) {
        tracing::debug!(position = self.state.cursor(), "command stream done");
        self.source.dispose();
    }

    fn advance(&mut self) -> Result<Option<Command>, Error> {
        match self
            .scanner
            .next_command(self.source.as_mut(), &mut self.state)
        {
            Ok(command) => Ok(command),
            Err(err) => {
                self.state.finish();
                Err(err.into())
            }
        }
    }
}

impl Iterator for CommandStream {
    type Item = Result<Command, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(command) = self.peeked.take() {
            return Some(Ok(command));
        }
        self.advance().transpose()
    }
}

impl Drop for CommandStream {
    fn drop(&mut self) {
        self.source.dispose();
    }
}

impl fmt::Debug for CommandStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandStream")
            .field("len", &self.source.len())
            .field("scanner", &self.scanner)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
