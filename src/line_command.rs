use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Statement forms that end at end-of-line without a delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineCommandKind {
    /// `SET TRANSACTION READ WRITE|ONLY`
    SetTransaction,
    /// `SET <option> ON|OFF`
    SetOption,
    /// `ECHO ON|OFF`
    Echo,
    /// `WHENEVER ERROR ...` / `WHENEVER SQLERROR ...`
    WheneverError,
    /// `DECLARE <rest>` on a single line.
    Declare,
    /// Oracle `@file` include directive.
    Include,
}

impl fmt::Display for LineCommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SetTransaction => "SET TRANSACTION",
            Self::SetOption => "SET",
            Self::Echo => "ECHO",
            Self::WheneverError => "WHENEVER ERROR",
            Self::Declare => "DECLARE",
            Self::Include => "@include",
        };
        f.write_str(name)
    }
}

/// Checked in order; the first match wins.
const COMMAND_PATTERNS: [(LineCommandKind, &str); 5] = [
    (
        LineCommandKind::SetTransaction,
        r"(?i)^SET\s+TRANSACTION\s+READ\s+(WRITE|ONLY)\s*;?$",
    ),
    (LineCommandKind::SetOption, r"(?i)^SET\s+\w+\s+(ON|OFF)\s*;?$"),
    (LineCommandKind::Echo, r"(?i)^ECHO\s+(ON|OFF)\s*;?$"),
    (LineCommandKind::WheneverError, r"(?i)^WHENEVER\s+(SQL)?ERROR\b.*$"),
    (LineCommandKind::Declare, r"(?i)^DECLARE\s+\S.*$"),
];

const INCLUDE_PATTERN: &str = r"^\s*@.*$";

static COMMANDS: LazyLock<Vec<(LineCommandKind, Regex)>> = LazyLock::new(|| {
    COMMAND_PATTERNS
        .iter()
        .map(|&(kind, pattern)| (kind, Regex::new(pattern).expect("valid line command pattern")))
        .collect()
});

static INCLUDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(INCLUDE_PATTERN).expect("valid include pattern"));

/// Recognizes single-line commands in a line of code.
///
/// The scanner only consults this at line ends, so the per-byte loop
/// never touches a regex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SingleLineCommandMatcher {
    check_commands: bool,
    include_directive: bool,
}

impl SingleLineCommandMatcher {
    #[must_use]
    pub const fn new(check_commands: bool, include_directive: bool) -> Self {
        Self {
            check_commands,
            include_directive,
        }
    }

    /// Whether any pattern is active.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.check_commands || self.include_directive
    }

    /// Classify `line`, which should already be stripped of comments.
    #[must_use]
    pub fn match_line(&self, line: &str) -> Option<LineCommandKind> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        if self.include_directive && INCLUDE.is_match(line) {
            return Some(LineCommandKind::Include);
        }
        if self.check_commands {
            return COMMANDS
                .iter()
                .find(|(_, regex)| regex.is_match(line))
                .map(|(kind, _)| *kind);
        }
        None
    }
}
