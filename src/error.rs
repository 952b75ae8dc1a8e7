//! Error types for projup

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn at(pos: Pos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input path does not exist
    FileNotFound { path: PathBuf },
    /// Malformed markup
    Parse,
    /// Document nesting exceeded the parser limit
    MaxDepthExceeded { max: usize },
    /// Input exceeded the parser size limit
    MaxSizeExceeded { max: usize },
    /// File extension is neither a project nor a solution
    UnsupportedFileType { extension: String },
    /// The tree could not be written back out
    Serialization,
    /// A rewrite pass met input it refuses to guess about
    Rewrite,
    /// Reading or writing a file failed
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound { path } => {
                write!(f, "provided file {} does not exist", path.display())
            }
            Self::Parse => write!(f, "malformed project markup"),
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::MaxSizeExceeded { max } => write!(f, "max size exceeded: {max}"),
            Self::UnsupportedFileType { extension } => {
                write!(f, "unsupported file type: '{extension}'")
            }
            Self::Serialization => write!(f, "failed to serialize project"),
            Self::Rewrite => write!(f, "rewrite failed"),
            Self::Io => write!(f, "i/o error"),
        }
    }
}

/// Main error type for projup
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Option<Span>,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span: None,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            span: None,
            message: message.into(),
        }
    }

    /// Create a parse error at a specific position
    pub fn parse_at(pos: Pos, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Parse,
            span: Some(Span::at(pos)),
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(ErrorKind::FileNotFound { path: path.into() })
    }

    /// Wrap an i/o failure on `path`, mapping a missing file to `FileNotFound`
    pub fn io(path: &Path, err: &io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            return Self::file_not_found(path);
        }
        Self::with_message(ErrorKind::Io, format!("{}: {err}", path.display()))
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// True for every failure raised while reading markup
    pub fn is_parse(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Parse | ErrorKind::MaxDepthExceeded { .. } | ErrorKind::MaxSizeExceeded { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.span {
            Some(span) => write!(f, "{} at {}", self.message, span.start),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Result type alias for projup
pub type Result<T> = std::result::Result<T, Error>;
