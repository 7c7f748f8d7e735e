use std::fmt;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Bytes read from disk per page by [`FileSource`].
const PAGE_SIZE: usize = 64 * 1024;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Error produced when reading script characters.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// A single-byte read past the end of the source.
    #[error("offset {offset} is out of range for a source of length {len}")]
    OutOfRange { offset: usize, len: usize },
    /// A slice whose bounds are reversed or past the end.
    #[error("range {start}..{end} is invalid for a source of length {len}")]
    InvalidRange {
        start: usize,
        end: usize,
        len: usize,
    },
    /// The requested text encoding is not supported.
    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(String),
    /// The script file could not be opened.
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Reading from an open script file failed.
    #[error("read error: {0}")]
    Io(#[from] io::Error),
    /// The source was used after `dispose()`.
    #[error("source has been disposed")]
    Disposed,
}

/// Text encodings accepted for script files.
///
/// All of them are ASCII-compatible, so quotes, comment markers, and
/// newlines can be found by looking at single bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    Latin1,
    Ascii,
}

impl Encoding {
    /// Canonical name of the encoding.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Latin1 => "ISO-8859-1",
            Self::Ascii => "US-ASCII",
        }
    }

    /// Decode raw bytes into a string. Malformed input is replaced
    /// with U+FFFD rather than rejected.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Self::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
            Self::Ascii => bytes
                .iter()
                .map(|&b| {
                    if b.is_ascii() {
                        char::from(b)
                    } else {
                        char::REPLACEMENT_CHARACTER
                    }
                })
                .collect(),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase().replace('_', "-");
        match name.as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "iso-8859-1" | "iso8859-1" | "latin1" | "latin-1" | "l1" => Ok(Self::Latin1),
            "us-ascii" | "ascii" => Ok(Self::Ascii),
            _ => Err(SourceError::UnsupportedEncoding(s.to_string())),
        }
    }
}

/// Random-access, read-only view over the bytes of a SQL script.
///
/// Offsets are byte offsets into the encoded script. The content never
/// changes while a scan is running, and `slice` returns exactly the text
/// in `[start, end)`.
///
/// Reads take `&mut self` so that file-backed sources can keep a page
/// cache without interior mutability.
pub trait CharSource {
    /// Number of bytes in the source.
    fn len(&self) -> usize;

    /// Whether the source holds no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Byte at `offset`.
    fn byte_at(&mut self, offset: usize) -> Result<u8, SourceError>;

    /// Decoded text of `[start, end)`.
    fn slice(&mut self, start: usize, end: usize) -> Result<String, SourceError>;

    /// Release any backing resource. Reads after this fail.
    fn dispose(&mut self) {}
}

const fn check_range(start: usize, end: usize, len: usize) -> Result<(), SourceError> {
    if start <= end && end <= len {
        Ok(())
    } else {
        Err(SourceError::InvalidRange { start, end, len })
    }
}

/// Script held entirely in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrSource {
    text: String,
}

impl StrSource {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl From<&str> for StrSource {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for StrSource {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl CharSource for StrSource {
    fn len(&self) -> usize {
        self.text.len()
    }

    fn byte_at(&mut self, offset: usize) -> Result<u8, SourceError> {
        self.text
            .as_bytes()
            .get(offset)
            .copied()
            .ok_or(SourceError::OutOfRange {
                offset,
                len: self.text.len(),
            })
    }

    fn slice(&mut self, start: usize, end: usize) -> Result<String, SourceError> {
        check_range(start, end, self.text.len())?;
        // Boundaries always sit on ASCII bytes when they come from the
        // scanner; arbitrary caller ranges may split a character.
        Ok(self.text.get(start..end).map_or_else(
            || Encoding::Utf8.decode(&self.text.as_bytes()[start..end]),
            str::to_string,
        ))
    }
}

/// Script read from disk on demand, one page at a time.
///
/// The file is opened once at construction and stays open until
/// [`CharSource::dispose`] is called or the value is dropped.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    file: Option<File>,
    encoding: Encoding,
    /// Bytes skipped at the start of the file (byte order mark).
    base: u64,
    len: usize,
    page_start: usize,
    page: Vec<u8>,
}

impl FileSource {
    /// Open `path`, decoding text with the named encoding.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::UnsupportedEncoding` for an unknown encoding
    /// name and `SourceError::Open` when the file cannot be opened.
    pub fn open(path: impl AsRef<Path>, encoding: &str) -> Result<Self, SourceError> {
        let encoding = encoding.parse::<Encoding>()?;
        Self::open_with(path, encoding)
    }

    /// Open `path` with an already resolved encoding.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Open` when the file cannot be opened or its
    /// size cannot be determined.
    pub fn open_with(path: impl AsRef<Path>, encoding: Encoding) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        let open_error = |source| SourceError::Open {
            path: path.clone(),
            source,
        };

        let mut file = File::open(&path).map_err(open_error)?;
        let size = file.metadata().map_err(open_error)?.len();

        let mut head = [0u8; 3];
        let mut base = 0;
        if encoding == Encoding::Utf8 && size >= 3 {
            file.read_exact(&mut head).map_err(open_error)?;
            if head == UTF8_BOM {
                base = 3;
            }
        }

        let len = usize::try_from(size - base).map_err(|_| {
            open_error(io::Error::new(
                io::ErrorKind::FileTooLarge,
                "script does not fit in the address space",
            ))
        })?;

        tracing::debug!(
            path = %path.display(),
            len,
            encoding = %encoding,
            "opened script file"
        );

        Ok(Self {
            path,
            file: Some(file),
            encoding,
            base,
            len,
            page_start: 0,
            page: Vec::new(),
        })
    }

    /// Path the source was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn encoding(&self) -> Encoding {
        self.encoding
    }

    fn read_at(&mut self, start: usize, buf: &mut [u8]) -> Result<(), SourceError> {
        let file = self.file.as_mut().ok_or(SourceError::Disposed)?;
        file.seek(SeekFrom::Start(self.base + start as u64))?;
        file.read_exact(buf)?;
        Ok(())
    }

    fn load_page(&mut self, offset: usize) -> Result<(), SourceError> {
        let start = offset - offset % PAGE_SIZE;
        let size = PAGE_SIZE.min(self.len - start);
        let mut page = std::mem::take(&mut self.page);
        page.resize(size, 0);
        let result = self.read_at(start, &mut page);
        self.page = page;
        if result.is_err() {
            self.page.clear();
        }
        result?;
        self.page_start = start;
        Ok(())
    }

    fn page_contains(&self, start: usize, end: usize) -> bool {
        !self.page.is_empty() && start >= self.page_start && end <= self.page_start + self.page.len()
    }
}

impl CharSource for FileSource {
    fn len(&self) -> usize {
        self.len
    }

    fn byte_at(&mut self, offset: usize) -> Result<u8, SourceError> {
        if self.file.is_none() {
            return Err(SourceError::Disposed);
        }
        if offset >= self.len {
            return Err(SourceError::OutOfRange {
                offset,
                len: self.len,
            });
        }
        if !self.page_contains(offset, offset + 1) {
            self.load_page(offset)?;
        }
        Ok(self.page[offset - self.page_start])
    }

    fn slice(&mut self, start: usize, end: usize) -> Result<String, SourceError> {
        if self.file.is_none() {
            return Err(SourceError::Disposed);
        }
        check_range(start, end, self.len)?;
        if self.page_contains(start, end) {
            let from = start - self.page_start;
            return Ok(self
                .encoding
                .decode(&self.page[from..from + (end - start)]));
        }
        let mut buf = vec![0u8; end - start];
        self.read_at(start, &mut buf)?;
        Ok(self.encoding.decode(&buf))
    }

    fn dispose(&mut self) {
        if self.file.take().is_some() {
            tracing::debug!(path = %self.path.display(), "closed script file");
        }
        self.page = Vec::new();
    }
}
