use crate::line_command::LineCommandKind;

/// What ended a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// The primary delimiter.
    Delimiter,
    /// The alternate delimiter.
    AlternateDelimiter,
    /// A single-line command ending at end-of-line.
    LineCommand(LineCommandKind),
    /// A blank line, with `empty_line_is_separator` enabled.
    EmptyLine,
    /// The end of the script.
    EndOfInput,
}

/// One executable command and where it sits in the script.
///
/// Offsets are byte offsets into the source. `end` is exclusive and
/// excludes the delimiter and trailing whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command text, or `None` when the splitter was configured to
    /// return offsets only.
    pub text: Option<String>,
    /// First non-whitespace byte.
    pub start: usize,
    pub end: usize,
    /// Start before leading whitespace was trimmed.
    pub whitespace_start: usize,
    /// 1-based line of `start`.
    pub line: usize,
    pub terminator: Terminator,
    /// The command holds nothing but comments.
    pub comment_only: bool,
}

impl Command {
    /// Text of the command, or `""` when it was withheld.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// Length of the command in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Never true for a command produced by the scanner.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(start: usize, end: usize) -> Command {
        Command {
            text: None,
            start,
            end,
            whitespace_start: start,
            line: 1,
            terminator: Terminator::EndOfInput,
            comment_only: false,
        }
    }

    #[test]
    fn withheld_text_reads_empty() {
        let cmd = command(0, 3);
        assert_eq!(cmd.text(), "");
        assert_eq!(cmd.len(), 3);
        assert!(!cmd.is_empty());
    }
}
