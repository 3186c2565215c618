use thiserror::Error;

/// Errors produced while decoding or extracting a tar archive.
#[derive(Error, Debug)]
pub enum TarError {
    /// A header block failed validation (bad octal field, checksum mismatch)
    #[error("malformed tar header: {reason}")]
    MalformedHeader { reason: String },

    /// The stream ended in the middle of a header block or an entry's content
    #[error("unexpected end of archive")]
    UnexpectedTruncation,

    /// An entry has a type the extractor was told not to tolerate
    #[error("unsupported entry type {flag:?} for {name:?}")]
    UnsupportedEntryType { name: String, flag: u8 },

    /// An entry path would resolve outside the destination root
    #[error("entry path escapes destination root: {name:?}")]
    PathEscape { name: String },

    /// IO error from the underlying stream or the filesystem
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl TarError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        TarError::MalformedHeader {
            reason: reason.into(),
        }
    }

    /// True for errors that poison the archive cursor: once seen, no further
    /// entries can be decoded from this stream.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TarError::MalformedHeader { .. } | TarError::UnexpectedTruncation | TarError::Io(_)
        )
    }
}

/// Result type alias for tar operations
pub type Result<T> = std::result::Result<T, TarError>;
