//! CLI tool to split SQL scripts into individual commands.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use sqlscript_rs::{CommandStream, DelimiterSpec, Error, ScriptSplitter, SplitterConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sqlscript",
    version,
    about = "Split SQL scripts into individual commands"
)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Print every command of the script(s)
    Split {
        #[command(flatten)]
        options: SplitOptions,
        /// Print index, line and byte offsets instead of text
        #[arg(long)]
        offsets: bool,
        /// Leave out commands that contain only comments
        #[arg(long)]
        skip_comments: bool,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the number of commands in the script(s)
    Count {
        #[command(flatten)]
        options: SplitOptions,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the command under a byte offset
    At {
        #[command(flatten)]
        options: SplitOptions,
        file: PathBuf,
        offset: usize,
    },
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Args)]
struct SplitOptions {
    /// Statement delimiter, e.g. `;`, `GO:nl`, `/;nl`, `oracle`, `mssql`
    #[arg(long, short = 'd')]
    delimiter: Option<String>,
    /// Alternate delimiter, same syntax as --delimiter
    #[arg(long)]
    alt_delimiter: Option<String>,
    /// Text encoding of the script files
    #[arg(long, default_value = "UTF-8")]
    encoding: String,
    /// Treat backslash-escaped quotes as part of the literal
    #[arg(long)]
    escaped_quotes: bool,
    /// A blank line ends a command
    #[arg(long)]
    empty_line_separator: bool,
    /// Treat `@file` lines as commands
    #[arg(long)]
    include_directive: bool,
    /// Treat SET/ECHO/DECLARE/WHENEVER lines as commands
    #[arg(long)]
    line_commands: bool,
    /// Keep leading whitespace in command text
    #[arg(long)]
    leading_whitespace: bool,
    /// Extra line comment token recognized at line start, e.g. `#`
    #[arg(long)]
    line_comment: Option<String>,
}

impl SplitOptions {
    fn config(&self) -> Result<SplitterConfig, Error> {
        let mut config = SplitterConfig::new()
            .delimiter(DelimiterSpec::parse_arg(self.delimiter.as_deref())?)
            .escaped_quotes(self.escaped_quotes)
            .empty_line_separator(self.empty_line_separator)
            .include_directive(self.include_directive)
            .single_line_commands(self.line_commands)
            .leading_whitespace(self.leading_whitespace);
        if let Some(alternate) = &self.alt_delimiter {
            config = config.alternate_delimiter(alternate.parse()?);
        }
        if let Some(token) = &self.line_comment {
            config = config.line_comment(token);
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        CliCommand::Split {
            options,
            offsets,
            skip_comments,
            files,
        } => for_each_file(files, |path| {
            split(path, options, *offsets, *skip_comments)
        }),
        CliCommand::Count { options, files } => for_each_file(files, |path| count(path, options)),
        CliCommand::At {
            options,
            file,
            offset,
        } => at(file, options, *offset).map_err(|e| {
            eprintln!("{}: {e}", file.display());
        }),
    };

    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Run `f` on every file, reporting errors and carrying on.
fn for_each_file(
    files: &[PathBuf],
    mut f: impl FnMut(&Path) -> Result<(), Error>,
) -> Result<(), ()> {
    let mut had_error = false;
    for path in files {
        if let Err(e) = f(path) {
            eprintln!("{}: {e}", path.display());
            had_error = true;
        }
    }
    if had_error { Err(()) } else { Ok(()) }
}

fn split(
    path: &Path,
    options: &SplitOptions,
    offsets: bool,
    skip_comments: bool,
) -> Result<(), Error> {
    let stream = CommandStream::from_file(path, &options.encoding, options.config()?)?;
    for (index, command) in stream.enumerate() {
        let command = command?;
        if skip_comments && command.comment_only {
            continue;
        }
        if offsets {
            println!(
                "{index}\t{}\t{}\t{}",
                command.line, command.start, command.end
            );
        } else {
            println!("-- [{index}] line {}", command.line);
            println!("{}", command.text());
        }
    }
    Ok(())
}

fn count(path: &Path, options: &SplitOptions) -> Result<(), Error> {
    let config = options.config()?.offsets_only();
    let mut total = 0usize;
    for command in CommandStream::from_file(path, &options.encoding, config)? {
        command?;
        total += 1;
    }
    println!("{}: {total}", path.display());
    Ok(())
}

fn at(path: &Path, options: &SplitOptions, offset: usize) -> Result<(), Error> {
    let mut splitter = ScriptSplitter::from_file(path, &options.encoding, options.config()?)?;
    let Some(index) = splitter.command_index_at(offset) else {
        eprintln!("{}: no command at offset {offset}", path.display());
        return Ok(());
    };
    let (start, end) = splitter
        .command(index)
        .map(|c| (c.start, c.end))
        .unwrap_or_default();
    let text = splitter.command_text(index)?.unwrap_or_default();
    println!("{index}\t{start}\t{end}");
    println!("{text}");
    splitter.done();
    Ok(())
}
