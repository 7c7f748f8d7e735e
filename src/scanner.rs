use crate::command::{Command, Terminator};
use crate::delimiter::DelimiterSpec;
use crate::line_command::SingleLineCommandMatcher;
use crate::source::{CharSource, SourceError};

/// Options controlling how a script is split.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone)]
pub struct SplitterConfig {
    pub primary_delimiter: DelimiterSpec,
    pub alternate_delimiter: Option<DelimiterSpec>,
    /// Treat `\'` and `\"` inside a literal as not closing it.
    pub check_escaped_quotes: bool,
    /// A blank line ends the current command.
    pub empty_line_is_separator: bool,
    /// `@file` lines are complete commands.
    pub support_include_directive: bool,
    /// `SET ... ON`, `ECHO`, `DECLARE`, `WHENEVER ERROR` and
    /// `SET TRANSACTION READ ...` lines are complete commands.
    pub check_single_line_commands: bool,
    /// Keep leading whitespace in the command text.
    pub return_leading_whitespace: bool,
    /// Extra line-comment token (e.g. `#`), recognized at line start.
    pub alternate_line_comment: Option<String>,
    /// Copy command text out of the source. When false only offsets
    /// are returned.
    pub include_text: bool,
}

impl SplitterConfig {
    /// Standard `;` delimiter, every optional behavior off.
    #[must_use]
    pub fn new() -> Self {
        Self {
            primary_delimiter: DelimiterSpec::standard(),
            alternate_delimiter: None,
            check_escaped_quotes: false,
            empty_line_is_separator: false,
            support_include_directive: false,
            check_single_line_commands: false,
            return_leading_whitespace: false,
            alternate_line_comment: None,
            include_text: true,
        }
    }

    /// Set the primary delimiter.
    #[must_use]
    pub fn delimiter(mut self, delimiter: DelimiterSpec) -> Self {
        self.primary_delimiter = delimiter;
        self
    }

    /// Set the alternate delimiter.
    #[must_use]
    pub fn alternate_delimiter(mut self, delimiter: DelimiterSpec) -> Self {
        self.alternate_delimiter = Some(delimiter);
        self
    }

    #[must_use]
    pub const fn escaped_quotes(mut self, enabled: bool) -> Self {
        self.check_escaped_quotes = enabled;
        self
    }

    #[must_use]
    pub const fn empty_line_separator(mut self, enabled: bool) -> Self {
        self.empty_line_is_separator = enabled;
        self
    }

    #[must_use]
    pub const fn include_directive(mut self, enabled: bool) -> Self {
        self.support_include_directive = enabled;
        self
    }

    #[must_use]
    pub const fn single_line_commands(mut self, enabled: bool) -> Self {
        self.check_single_line_commands = enabled;
        self
    }

    #[must_use]
    pub const fn leading_whitespace(mut self, enabled: bool) -> Self {
        self.return_leading_whitespace = enabled;
        self
    }

    /// Recognize `token` as a line comment at line start. An empty
    /// token clears the setting.
    #[must_use]
    pub fn line_comment(mut self, token: &str) -> Self {
        let token = token.trim();
        self.alternate_line_comment = (!token.is_empty()).then(|| token.to_string());
        self
    }

    /// Return offsets only; command text is left as `None`.
    #[must_use]
    pub const fn offsets_only(mut self) -> Self {
        self.include_text = false;
        self
    }
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum CommentKind {
    #[default]
    None,
    Line,
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Scanning,
    /// Input exhausted, remainder not yet emitted.
    Remainder,
    Done,
}

/// Position and lexical context of a scan.
///
/// Threaded through [`BoundaryScanner::next_command`]; cloning it
/// snapshots the scan. A quote and a comment are never open at the
/// same time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerState {
    cursor: usize,
    quote: Option<u8>,
    comment: CommentKind,
    line: usize,
    line_start: usize,
    /// Code extent of the current line.
    line_code: Option<(usize, usize)>,
    /// The current line began outside literals and block comments and
    /// holds only whitespace so far.
    line_blank: bool,
    /// End of the previous command, start of the pending one.
    command_start: usize,
    /// First non-whitespace byte of the pending command and its line.
    first_text: Option<(usize, usize)>,
    /// First byte of the pending command outside comments.
    command_code: Option<usize>,
    phase: Phase,
}

impl ScannerState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cursor: 0,
            quote: None,
            comment: CommentKind::None,
            line: 1,
            line_start: 0,
            line_code: None,
            line_blank: true,
            command_start: 0,
            first_text: None,
            command_code: None,
            phase: Phase::Scanning,
        }
    }

    /// Offset of the next byte to inspect.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the scan has produced its last command.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Whether the cursor sits inside a string literal.
    #[must_use]
    pub const fn in_quote(&self) -> bool {
        self.quote.is_some()
    }

    /// Whether the cursor sits inside a line or block comment.
    #[must_use]
    pub fn in_comment(&self) -> bool {
        self.comment != CommentKind::None
    }

    /// Stop the scan; later steps yield nothing.
    pub(crate) const fn finish(&mut self) {
        self.phase = Phase::Done;
    }

    const fn mark_text(&mut self, pos: usize) {
        if self.first_text.is_none() {
            self.first_text = Some((pos, self.line));
        }
    }

    const fn mark_code(&mut self, pos: usize) {
        self.mark_text(pos);
        if self.command_code.is_none() {
            self.command_code = Some(pos);
        }
        let start = match self.line_code {
            Some((start, _)) => start,
            None => pos,
        };
        self.line_code = Some((start, pos + 1));
    }

    const fn new_line(&mut self, newline: usize) {
        self.line += 1;
        self.line_start = newline + 1;
        self.line_code = None;
        self.line_blank = self.quote.is_none() && !matches!(self.comment, CommentKind::Block);
    }

    const fn begin_command(&mut self, start: usize) {
        self.command_start = start;
        self.first_text = None;
        self.command_code = None;
    }
}

impl Default for ScannerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Finds command boundaries in a script.
///
/// The scanner holds configuration only. All mutable progress lives in
/// a [`ScannerState`], so the same scanner can drive any number of
/// scans.
#[derive(Debug, Clone)]
pub struct BoundaryScanner {
    config: SplitterConfig,
    matcher: SingleLineCommandMatcher,
}

impl BoundaryScanner {
    #[must_use]
    pub fn new(config: SplitterConfig) -> Self {
        let matcher = SingleLineCommandMatcher::new(
            config.check_single_line_commands,
            config.support_include_directive,
        );
        Self { config, matcher }
    }

    #[must_use]
    pub const fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// Offset where the stored text of `command` begins.
    #[must_use]
    pub const fn text_start(&self, command: &Command) -> usize {
        if self.config.return_leading_whitespace {
            command.whitespace_start
        } else {
            command.start
        }
    }

    /// Advance `state` to the next command and return it, or `None`
    /// once the script is exhausted.
    ///
    /// Unterminated literals and comments are not errors: the rest of
    /// the script belongs to them and becomes part of the last command.
    ///
    /// # Errors
    ///
    /// Propagates read failures from the source.
    pub fn next_command(
        &self,
        source: &mut dyn CharSource,
        state: &mut ScannerState,
    ) -> Result<Option<Command>, SourceError> {
        let len = source.len();

        while state.cursor < len {
            let pos = state.cursor;
            let ch = source.byte_at(pos)?;
            if !ch.is_ascii_whitespace() {
                state.line_blank = false;
            }

            if let Some(quote) = state.quote {
                if ch == b'\n' {
                    state.new_line(pos);
                } else {
                    state.mark_code(pos);
                    if ch == quote && !self.is_escaped(source, pos)? {
                        state.quote = None;
                    }
                }
                state.cursor += 1;
                continue;
            }

            match state.comment {
                CommentKind::Block => {
                    if ch == b'*' && peek(source, pos + 1)? == Some(b'/') {
                        state.comment = CommentKind::None;
                        state.cursor += 2;
                    } else {
                        if ch == b'\n' {
                            state.new_line(pos);
                        }
                        state.cursor += 1;
                    }
                    continue;
                }
                CommentKind::Line if ch != b'\n' => {
                    state.cursor += 1;
                    continue;
                }
                // the newline ending the comment is handled below
                CommentKind::Line => state.comment = CommentKind::None,
                CommentKind::None => {}
            }

            if ch == b'\n' {
                let command = self.end_of_line(source, state, pos, false)?;
                state.new_line(pos);
                state.cursor = pos + 1;
                if command.is_some() {
                    return Ok(command);
                }
                continue;
            }

            if ch.is_ascii_whitespace() {
                state.cursor += 1;
                continue;
            }

            if ch == b'\'' || ch == b'"' {
                state.mark_code(pos);
                state.quote = Some(ch);
                state.cursor += 1;
                continue;
            }

            if ch == b'-' && peek(source, pos + 1)? == Some(b'-') {
                state.mark_text(pos);
                state.comment = CommentKind::Line;
                state.cursor += 2;
                continue;
            }

            if let Some(token) = self.line_comment_at_line_start(source, state, pos)? {
                state.mark_text(pos);
                state.comment = CommentKind::Line;
                state.cursor += token;
                continue;
            }

            if ch == b'/' && peek(source, pos + 1)? == Some(b'*') {
                state.mark_text(pos);
                state.comment = CommentKind::Block;
                state.cursor += 2;
                continue;
            }

            if let Some((delimiter_len, terminator)) = self.inline_delimiter_at(source, pos)? {
                let command = self.build(source, state, pos, terminator)?;
                state.begin_command(pos + delimiter_len);
                state.cursor = pos + delimiter_len;
                if command.is_some() {
                    return Ok(command);
                }
                continue;
            }

            state.mark_code(pos);
            state.cursor += 1;
        }

        if state.phase == Phase::Scanning {
            state.phase = Phase::Remainder;
            if state.quote.is_none() && state.comment != CommentKind::Block {
                state.comment = CommentKind::None;
                let command = self.end_of_line(source, state, len, true)?;
                if command.is_some() {
                    return Ok(command);
                }
            }
        }

        if state.phase == Phase::Remainder {
            state.phase = Phase::Done;
            let start = state.command_start.min(len);
            state.command_start = start;
            return self.build(source, state, len, Terminator::EndOfInput);
        }

        Ok(None)
    }

    /// Line-end rules: single-line delimiter, single-line commands,
    /// blank-line separator. Only whitespace-only lines count as blank,
    /// so a comment line never splits a command. `eol` is the offset of the `\n`, or the
    /// source length for the last line.
    fn end_of_line(
        &self,
        source: &mut dyn CharSource,
        state: &mut ScannerState,
        eol: usize,
        at_eof: bool,
    ) -> Result<Option<Command>, SourceError> {
        let next = (eol + 1).min(source.len());

        if let Some((code_start, code_end)) = state.line_code {
            for (delimiter, terminator) in self.delimiters() {
                if delimiter.is_single_line()
                    && code_end - code_start == delimiter.len()
                    && delimiter.matches_line(&source.slice(code_start, code_end)?)
                {
                    let raw_end = state.line_start.max(state.command_start);
                    let command = self.build(source, state, raw_end, terminator)?;
                    state.begin_command(next);
                    return Ok(command);
                }
            }
        }

        if self.matcher.is_enabled() {
            if let (Some(code_start), Some((_, code_end))) = (state.command_code, state.line_code) {
                if code_start >= state.line_start {
                    let line = source.slice(code_start, code_end)?;
                    if let Some(kind) = self.matcher.match_line(&line) {
                        let command =
                            self.build(source, state, code_end, Terminator::LineCommand(kind))?;
                        state.begin_command(next);
                        return Ok(command);
                    }
                }
            }
        }

        if self.config.empty_line_is_separator
            && !at_eof
            && state.line_blank
            && state.command_code.is_some()
        {
            let raw_end = state.line_start.max(state.command_start);
            let command = self.build(source, state, raw_end, Terminator::EmptyLine)?;
            state.begin_command(next);
            return Ok(command);
        }

        Ok(None)
    }

    /// Turn `[state.command_start, raw_end)` into a command, or `None`
    /// when nothing but whitespace remains.
    fn build(
        &self,
        source: &mut dyn CharSource,
        state: &ScannerState,
        raw_end: usize,
        terminator: Terminator,
    ) -> Result<Option<Command>, SourceError> {
        let Some((start, line)) = state.first_text else {
            return Ok(None);
        };
        if start >= raw_end {
            return Ok(None);
        }

        // raw_end always precedes any delimiter matched outside literals
        // and comments, so nothing is stripped here
        let end = trim_end(source, start, raw_end)?;
        if end <= start {
            return Ok(None);
        }

        let whitespace_start = state.command_start;
        let text = if self.config.include_text {
            let text_start = if self.config.return_leading_whitespace {
                whitespace_start
            } else {
                start
            };
            Some(source.slice(text_start, end)?)
        } else {
            None
        };
        let comment_only = state.command_code.is_none_or(|code| code >= end);

        tracing::trace!(start, end, line, ?terminator, "command boundary");

        Ok(Some(Command {
            text,
            start,
            end,
            whitespace_start,
            line,
            terminator,
            comment_only,
        }))
    }

    fn delimiters(&self) -> impl Iterator<Item = (&DelimiterSpec, Terminator)> {
        std::iter::once((&self.config.primary_delimiter, Terminator::Delimiter)).chain(
            self.config
                .alternate_delimiter
                .iter()
                .map(|delimiter| (delimiter, Terminator::AlternateDelimiter)),
        )
    }

    fn inline_delimiter_at(
        &self,
        source: &mut dyn CharSource,
        pos: usize,
    ) -> Result<Option<(usize, Terminator)>, SourceError> {
        for (delimiter, terminator) in self.delimiters() {
            if !delimiter.is_single_line() && delimiter.matches(source, pos)? {
                return Ok(Some((delimiter.len(), terminator)));
            }
        }
        Ok(None)
    }

    /// Length of the alternate line-comment token if it starts at
    /// `pos` with no code before it on the line.
    fn line_comment_at_line_start(
        &self,
        source: &mut dyn CharSource,
        state: &ScannerState,
        pos: usize,
    ) -> Result<Option<usize>, SourceError> {
        let Some(token) = self.config.alternate_line_comment.as_deref() else {
            return Ok(None);
        };
        if token.is_empty() || state.line_code.is_some() || pos + token.len() > source.len() {
            return Ok(None);
        }
        for (i, expected) in token.bytes().enumerate() {
            if source.byte_at(pos + i)? != expected {
                return Ok(None);
            }
        }
        Ok(Some(token.len()))
    }

    /// Backslash check for a quote character. Only the single preceding
    /// byte is inspected, so `\\'` still counts as escaped.
    fn is_escaped(&self, source: &mut dyn CharSource, pos: usize) -> Result<bool, SourceError> {
        if !self.config.check_escaped_quotes || pos == 0 {
            return Ok(false);
        }
        Ok(source.byte_at(pos - 1)? == b'\\')
    }
}

fn peek(source: &mut dyn CharSource, pos: usize) -> Result<Option<u8>, SourceError> {
    if pos < source.len() {
        source.byte_at(pos).map(Some)
    } else {
        Ok(None)
    }
}

fn trim_end(source: &mut dyn CharSource, start: usize, end: usize) -> Result<usize, SourceError> {
    let mut end = end;
    while end > start && source.byte_at(end - 1)?.is_ascii_whitespace() {
        end -= 1;
    }
    Ok(end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_command::LineCommandKind;
    use crate::source::StrSource;

    fn scan(text: &str, config: SplitterConfig) -> Vec<Command> {
        let scanner = BoundaryScanner::new(config);
        let mut source = StrSource::new(text);
        let mut state = ScannerState::new();
        let mut commands = Vec::new();
        while let Some(command) = scanner
            .next_command(&mut source, &mut state)
            .expect("scan")
        {
            commands.push(command);
        }
        assert!(state.is_finished());
        commands
    }

    fn texts(text: &str, config: SplitterConfig) -> Vec<String> {
        scan(text, config)
            .into_iter()
            .map(|c| c.text.expect("text"))
            .collect()
    }

    #[test]
    fn splits_on_semicolon() {
        assert_eq!(
            texts("select 1; select 2;", SplitterConfig::new()),
            ["select 1", "select 2"]
        );
    }

    #[test]
    fn last_command_without_delimiter() {
        assert_eq!(
            texts("select 1;\nselect 2\n", SplitterConfig::new()),
            ["select 1", "select 2"]
        );
    }

    #[test]
    fn semicolon_in_literals() {
        let commands = scan("select ';' from t; select \"a;b\";", SplitterConfig::new());
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].text(), "select ';' from t");
        assert_eq!(commands[1].text(), "select \"a;b\"");
    }

    #[test]
    fn doubled_quotes_stay_balanced() {
        assert_eq!(
            texts("select 'it''s;' from t; select 2", SplitterConfig::new()),
            ["select 'it''s;' from t", "select 2"]
        );
    }

    #[test]
    fn semicolon_in_comments() {
        assert_eq!(
            texts("/* a;b */ select 1;", SplitterConfig::new()),
            ["/* a;b */ select 1"]
        );
        assert_eq!(
            texts("select 1 -- not; here\nfrom t;", SplitterConfig::new()),
            ["select 1 -- not; here\nfrom t"]
        );
    }

    #[test]
    fn block_comment_does_not_nest() {
        assert_eq!(
            texts("/* /* x */ select 1; */ select 2;", SplitterConfig::new()),
            ["/* /* x */ select 1", "*/ select 2"]
        );
    }

    #[test]
    fn quotes_inside_comments_are_inert() {
        assert_eq!(
            texts("-- don't\nselect 1; select 2;", SplitterConfig::new()),
            ["-- don't\nselect 1", "select 2"]
        );
    }

    #[test]
    fn escaped_quotes() {
        let input = r"select 'a\';b'; select 2;";
        assert_eq!(
            texts(input, SplitterConfig::new().escaped_quotes(true)),
            [r"select 'a\';b'", "select 2"]
        );
        // without escape handling the literal closes at \' and ;b' opens
        // a new literal that swallows the rest
        assert_eq!(
            texts(input, SplitterConfig::new()),
            [r"select 'a\'", "b'; select 2"]
        );
    }

    #[test]
    fn double_backslash_still_escapes() {
        let input = r"select 'a\\'; select 2;";
        let commands = scan(input, SplitterConfig::new().escaped_quotes(true));
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn unterminated_literal_runs_to_end() {
        let commands = scan("select 1; select 'abc", SplitterConfig::new());
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[1].text(), "select 'abc");
        assert_eq!(commands[1].terminator, Terminator::EndOfInput);
    }

    #[test]
    fn unterminated_block_comment_runs_to_end() {
        let commands = scan("select 1; /* open; still", SplitterConfig::new());
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[1].text(), "/* open; still");
        assert!(commands[1].comment_only);
    }

    #[test]
    fn empty_statements_are_absorbed() {
        assert_eq!(
            texts(";; select 1;;\n ; \n", SplitterConfig::new()),
            ["select 1"]
        );
        assert!(scan("   \n\t ", SplitterConfig::new()).is_empty());
        assert!(scan("", SplitterConfig::new()).is_empty());
    }

    #[test]
    fn single_line_go() {
        let config = SplitterConfig::new().delimiter(DelimiterSpec::mssql());
        let commands = scan("select 1\nGO\nselect 2\nGO", config);
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].text(), "select 1");
        assert_eq!(commands[1].text(), "select 2");
        assert_eq!(commands[1].terminator, Terminator::Delimiter);
    }

    #[test]
    fn single_line_delimiter_must_be_alone() {
        let config = SplitterConfig::new().delimiter(DelimiterSpec::mssql());
        assert_eq!(
            texts("select go_time from t go\nselect 2\n  go  \n", config),
            ["select go_time from t go\nselect 2"]
        );
    }

    #[test]
    fn single_line_delimiter_with_trailing_comment() {
        let config = SplitterConfig::new().delimiter(DelimiterSpec::mssql());
        assert_eq!(
            texts("select 1\nGO -- batch end\nselect 2", config),
            ["select 1", "select 2"]
        );
    }

    #[test]
    fn alternate_delimiter() {
        let config = SplitterConfig::new().alternate_delimiter(DelimiterSpec::oracle());
        let commands = scan(
            "create procedure p as begin null; end;\n/\nselect 1;",
            config,
        );
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0].text(), "create procedure p as begin null");
        assert_eq!(commands[1].text(), "end");
        assert_eq!(commands[2].text(), "select 1");
    }

    #[test]
    fn oracle_slash_ends_block() {
        let config = SplitterConfig::new().delimiter(DelimiterSpec::oracle());
        let commands = scan("begin\n  null;\nend;\n/\nselect 1 from dual\n/\n", config);
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].text(), "begin\n  null;\nend;");
        assert_eq!(commands[0].terminator, Terminator::Delimiter);
        assert_eq!(commands[1].text(), "select 1 from dual");
    }

    #[test]
    fn word_delimiter_inline() {
        let config = SplitterConfig::new().delimiter(DelimiterSpec::new("GO", false).expect("go"));
        assert_eq!(
            texts("select category from t go select 2", config),
            ["select category from t", "select 2"]
        );
    }

    #[test]
    fn single_line_commands() {
        let config = SplitterConfig::new().single_line_commands(true);
        let commands = scan("SET ECHO ON\nselect 1;", config);
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].text(), "SET ECHO ON");
        assert_eq!(
            commands[0].terminator,
            Terminator::LineCommand(LineCommandKind::SetOption)
        );
        assert_eq!(commands[1].text(), "select 1");
    }

    #[test]
    fn single_line_commands_disabled() {
        assert_eq!(
            texts("SET ECHO ON\nselect 1;", SplitterConfig::new()),
            ["SET ECHO ON\nselect 1"]
        );
    }

    #[test]
    fn single_line_command_only_at_command_start() {
        let config = SplitterConfig::new().single_line_commands(true);
        assert_eq!(
            texts("update t\nset flag on\nwhere id = 1;", config),
            ["update t\nset flag on\nwhere id = 1"]
        );
    }

    #[test]
    fn single_line_command_after_inline_delimiter() {
        let config = SplitterConfig::new().single_line_commands(true);
        assert_eq!(
            texts("select 1; set echo off -- quiet\nselect 2", config),
            ["select 1", "set echo off", "select 2"]
        );
    }

    #[test]
    fn include_directive() {
        let config = SplitterConfig::new().include_directive(true);
        let commands = scan("@setup.sql\nselect 1;\n@teardown.sql", config);
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0].text(), "@setup.sql");
        assert_eq!(
            commands[0].terminator,
            Terminator::LineCommand(LineCommandKind::Include)
        );
        assert_eq!(commands[2].text(), "@teardown.sql");
        assert_eq!(
            commands[2].terminator,
            Terminator::LineCommand(LineCommandKind::Include)
        );
    }

    #[test]
    fn empty_line_separator() {
        let config = SplitterConfig::new().empty_line_separator(true);
        let commands = scan("select 1\nfrom t\n\n-- note\n\nselect 2\n", config);
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].text(), "select 1\nfrom t");
        assert_eq!(commands[0].terminator, Terminator::EmptyLine);
        assert_eq!(commands[1].text(), "-- note\n\nselect 2");
        assert_eq!(commands[1].terminator, Terminator::EndOfInput);
    }

    #[test]
    fn blank_line_inside_comment_or_literal_does_not_split() {
        let config = SplitterConfig::new().empty_line_separator(true);
        assert_eq!(
            texts("select 1 /* a\n\n b */\nfrom t\n\nselect 2", config.clone()),
            ["select 1 /* a\n\n b */\nfrom t", "select 2"]
        );
        assert_eq!(
            texts("select 'a\n\nb'\n\nselect 2", config),
            ["select 'a\n\nb'", "select 2"]
        );
    }

    #[test]
    fn comment_lines_are_not_blank() {
        let config = SplitterConfig::new().empty_line_separator(true);
        assert_eq!(
            texts("select 1 /* a\n b */\nfrom t", config.clone()),
            ["select 1 /* a\n b */\nfrom t"]
        );
        assert_eq!(
            texts("select 1\n-- c\nfrom t", config),
            ["select 1\n-- c\nfrom t"]
        );
    }

    #[test]
    fn delimiter_text_inside_open_literal_or_comment_is_kept() {
        assert_eq!(
            texts("select 'abc;", SplitterConfig::new()),
            ["select 'abc;"]
        );
        assert_eq!(
            texts("select 1 -- note;", SplitterConfig::new()),
            ["select 1 -- note;"]
        );
        let go = SplitterConfig::new().delimiter(DelimiterSpec::mssql());
        assert_eq!(
            texts("select 1\n/*\ngo", go.clone()),
            ["select 1\n/*\ngo"]
        );
        assert_eq!(
            texts("select 1\n-- go\ngo", go),
            ["select 1\n-- go"]
        );
    }

    #[test]
    fn alternate_line_comment_at_line_start_only() {
        let config = SplitterConfig::new().line_comment("#");
        assert_eq!(
            texts("# setup; part\nselect 1;\nselect #tmp; select 2;", config),
            ["# setup; part\nselect 1", "select #tmp", "select 2"]
        );
    }

    #[test]
    fn leading_whitespace_kept() {
        let config = SplitterConfig::new().leading_whitespace(true);
        let commands = scan("select 1;\n\n  select 2;", config);
        assert_eq!(commands[1].text(), "\n\n  select 2");
        assert_eq!(commands[1].whitespace_start, 9);
        assert_eq!(commands[1].start, 13);
    }

    #[test]
    fn offsets_only() {
        let commands = scan("select 1;  select 2", SplitterConfig::new().offsets_only());
        assert!(commands.iter().all(|c| c.text.is_none()));
        assert_eq!((commands[0].start, commands[0].end), (0, 8));
        assert_eq!(
            (
                commands[1].whitespace_start,
                commands[1].start,
                commands[1].end
            ),
            (9, 11, 19)
        );
    }

    #[test]
    fn line_numbers() {
        let commands = scan("\n-- header\nselect 1;\n\nselect\n2;", SplitterConfig::new());
        assert_eq!(commands[0].line, 2);
        assert_eq!(commands[1].line, 5);
    }

    #[test]
    fn comment_only_commands_are_flagged() {
        let commands = scan("select 1; -- trailing note", SplitterConfig::new());
        assert_eq!(commands.len(), 2);
        assert!(!commands[0].comment_only);
        assert!(commands[1].comment_only);
    }

    #[test]
    fn crlf_line_endings() {
        let config = SplitterConfig::new().delimiter(DelimiterSpec::mssql());
        assert_eq!(
            texts("select 1\r\nGO\r\nselect 2\r\n", config),
            ["select 1", "select 2"]
        );
    }

    #[test]
    fn state_is_resumable_from_clone() {
        let scanner = BoundaryScanner::new(SplitterConfig::new());
        let mut source = StrSource::new("a; b; c;");
        let mut state = ScannerState::new();
        let first = scanner
            .next_command(&mut source, &mut state)
            .expect("scan")
            .expect("command");
        assert_eq!(first.text(), "a");

        let mut snapshot = state.clone();
        let from_state = scanner.next_command(&mut source, &mut state).expect("scan");
        let from_snapshot = scanner
            .next_command(&mut source, &mut snapshot)
            .expect("scan");
        assert_eq!(from_state, from_snapshot);
    }

    #[test]
    fn state_reports_context() {
        let scanner = BoundaryScanner::new(SplitterConfig::new());
        let mut source = StrSource::new("select 'x; /* y");
        let mut state = ScannerState::new();
        let command = scanner
            .next_command(&mut source, &mut state)
            .expect("scan")
            .expect("command");
        assert_eq!(command.text(), "select 'x; /* y");
        assert!(state.in_quote());
        assert!(!state.in_comment());
        assert_eq!(state.cursor(), 15);
    }
}
