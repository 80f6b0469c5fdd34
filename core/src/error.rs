use crate::index::DocId;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failures reading or writing corpus files and persisted tables.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("file was not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("error reading {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error writing {}: {source}", .path.display())]
    Unwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file exists and was read, but its contents do not decode.
    #[error("{}:{line}: {reason}", .path.display())]
    Corrupt { path: PathBuf, line: usize, reason: String },

    #[error("encoding table failed: {0}")]
    Encode(String),
}

impl StoreError {
    /// Classify an I/O error raised while opening or reading `path`.
    pub fn from_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            StoreError::NotFound { path }
        } else {
            StoreError::Unreadable { path, source }
        }
    }

    pub fn from_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Unwritable { path: path.into(), source }
    }
}

/// A page record that cannot join the corpus. Indexing skips it and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecord {
    #[error("page has no id")]
    MissingId,

    #[error("page {id} has no title")]
    MissingTitle { id: DocId },

    #[error("page id {id} is already taken")]
    DuplicateId { id: DocId },

    #[error("page {id} repeats the title {title:?}")]
    DuplicateTitle { id: DocId, title: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("document {0} was already counted")]
    DuplicateDocument(DocId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("query exceeded its time budget of {0:?}")]
    Timeout(Duration),
}
