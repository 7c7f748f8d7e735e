use std::fmt;
use std::str::FromStr;

use crate::source::{CharSource, SourceError};

/// Suffixes of a command-line token that request single-line mode.
const SINGLE_LINE_SUFFIXES: [&str; 2] = [";nl", ":nl"];

/// Classifies a delimiter error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelimiterErrorKind {
    /// Delimiter text is empty.
    Empty,
    /// Delimiter text contains whitespace.
    ContainsWhitespace,
}

impl fmt::Display for DelimiterErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "delimiter is empty"),
            Self::ContainsWhitespace => {
                write!(f, "delimiter contains whitespace")
            }
        }
    }
}

/// Error produced when building a delimiter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {text:?}")]
pub struct DelimiterError {
    pub kind: DelimiterErrorKind,
    pub text: String,
}

/// One statement terminator.
///
/// Alphabetic delimiters such as `GO` match case-insensitively and only
/// as whole words. A single-line delimiter is only recognized when it
/// is the sole code on its line.
#[derive(Debug, Clone)]
pub struct DelimiterSpec {
    text: String,
    single_line: bool,
}

impl DelimiterSpec {
    /// Create a delimiter.
    ///
    /// # Errors
    ///
    /// Returns `DelimiterError` when `text` is empty or contains
    /// whitespace.
    pub fn new(text: &str, single_line: bool) -> Result<Self, DelimiterError> {
        let kind = if text.is_empty() {
            DelimiterErrorKind::Empty
        } else if text.chars().any(char::is_whitespace) {
            DelimiterErrorKind::ContainsWhitespace
        } else {
            return Ok(Self {
                text: text.to_string(),
                single_line,
            });
        };
        Err(DelimiterError {
            kind,
            text: text.to_string(),
        })
    }

    /// The standard `;` terminator.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            text: ";".to_string(),
            single_line: false,
        }
    }

    /// Oracle's `/` on a line of its own.
    #[must_use]
    pub fn oracle() -> Self {
        Self {
            text: "/".to_string(),
            single_line: true,
        }
    }

    /// SQL Server's `GO` on a line of its own.
    #[must_use]
    pub fn mssql() -> Self {
        Self {
            text: "GO".to_string(),
            single_line: true,
        }
    }

    /// Parse a command-line token.
    ///
    /// An absent or blank token yields the standard delimiter. A
    /// trailing `;nl` or `:nl` requests single-line mode, and the names
    /// `oracle` and `mssql` select those dialects' delimiters.
    ///
    /// # Errors
    ///
    /// Returns `DelimiterError` when the remaining text contains
    /// whitespace.
    pub fn parse_arg(token: Option<&str>) -> Result<Self, DelimiterError> {
        let token = token.map_or("", str::trim);
        if token.is_empty() {
            return Ok(Self::standard());
        }
        if token.eq_ignore_ascii_case("oracle") {
            return Ok(Self::oracle());
        }
        if token.eq_ignore_ascii_case("mssql") {
            return Ok(Self::mssql());
        }

        for suffix in SINGLE_LINE_SUFFIXES {
            if token.len() > suffix.len() {
                let split = token.len() - suffix.len();
                if token.is_char_boundary(split) && token[split..].eq_ignore_ascii_case(suffix) {
                    return Self::new(&token[..split], true);
                }
            }
        }

        Self::new(token, false)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn is_single_line(&self) -> bool {
        self.single_line
    }

    /// Length of the delimiter text in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Always false; delimiters are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether this is the plain `;` terminator.
    #[must_use]
    pub fn is_standard(&self) -> bool {
        self.text == ";" && !self.single_line
    }

    /// Whether the text contains letters and so must match as a word.
    #[must_use]
    pub fn is_word(&self) -> bool {
        self.text.bytes().any(|b| b.is_ascii_alphabetic())
    }

    /// Whether the delimiter occurs at `at` in `source`.
    ///
    /// # Errors
    ///
    /// Propagates read failures from the source.
    pub fn matches(&self, source: &mut dyn CharSource, at: usize) -> Result<bool, SourceError> {
        let end = at + self.text.len();
        if end > source.len() {
            return Ok(false);
        }
        for (i, expected) in self.text.bytes().enumerate() {
            if !source.byte_at(at + i)?.eq_ignore_ascii_case(&expected) {
                return Ok(false);
            }
        }
        if self.is_word() {
            if at > 0 && is_word_byte(source.byte_at(at - 1)?) {
                return Ok(false);
            }
            if end < source.len() && is_word_byte(source.byte_at(end)?) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Whether `line`, trimmed, is exactly the delimiter text.
    #[must_use]
    pub fn matches_line(&self, line: &str) -> bool {
        line.trim().eq_ignore_ascii_case(&self.text)
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b == b'#' || b >= 0x80
}

impl Default for DelimiterSpec {
    fn default() -> Self {
        Self::standard()
    }
}

/// Two delimiters are equal when their texts match under the matching
/// rule. The single-line flag is not compared.
impl PartialEq for DelimiterSpec {
    fn eq(&self, other: &Self) -> bool {
        self.text.eq_ignore_ascii_case(&other.text)
    }
}

impl Eq for DelimiterSpec {}

impl fmt::Display for DelimiterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.single_line {
            write!(f, "{}:nl", self.text)
        } else {
            f.write_str(&self.text)
        }
    }
}

impl FromStr for DelimiterSpec {
    type Err = DelimiterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_arg(Some(s))
    }
}
