use thiserror::Error;

/// Failures that reach the caller of an analysis.
///
/// Upstream registry, advisory, feed, and cache failures never surface
/// here; they are swallowed at the call site and at most mark a node with
/// a resolution error. Only input validation and unexpected internal
/// failures become an `AnalysisError`.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Missing or invalid manifest/ecosystem, or a manifest that yields
    /// no dependencies.
    #[error("{0}")]
    Client(String),

    /// Unexpected failure inside the orchestrator.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AnalysisError {
    /// HTTP status the entry shim should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            AnalysisError::Client(_) => 400,
            AnalysisError::Internal(_) => 500,
        }
    }
}
