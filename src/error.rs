use std::path::PathBuf;

/// Failures from the storage layer. `Unavailable` and `NotFound` are kept
/// apart so callers can tell an empty result from a missing store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("planner database is not available")]
    Unavailable,

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    #[error("{0}")]
    Invalid(String),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Attachment(#[from] AttachmentError),
}

impl StoreError {
    pub fn task_not_found(id: i64) -> Self {
        Self::NotFound { kind: "task", id }
    }

    pub fn schedule_not_found(id: i64) -> Self {
        Self::NotFound {
            kind: "schedule entry",
            id,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AttachmentError {
    #[error("file '{}' does not exist", .0.display())]
    MissingSource(PathBuf),

    #[error("'{}' has no file name", .0.display())]
    NoFileName(PathBuf),

    #[error("failed to copy '{}' to '{}': {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("io error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
