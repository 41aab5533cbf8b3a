//! Error taxonomy for the doctriage workflow.

/// Errors produced by the build-and-triage workflow.
///
/// Any of these aborts the run immediately; there is no retry path. Failed
/// notebook executions are not errors here; they surface as a
/// [`TriageVerdict`] with `passed == false`.
///
/// [`TriageVerdict`]: crate::triage::TriageVerdict
#[derive(Debug, thiserror::Error)]
pub enum DoctriageError {
    #[error("git error: {0}")]
    Git(String),

    #[error("failed to spawn build command '{command}': {source}")]
    BuildSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("report enumeration error: {0}")]
    ReportGlob(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for doctriage operations.
pub type Result<T> = std::result::Result<T, DoctriageError>;
