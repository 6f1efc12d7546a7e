//! Error types for the generation pipeline.

use avrosynth_schema::SchemaParseError;
use thiserror::Error;

/// Failure of an external collaborator.
///
/// Distinct from parse errors: the document never reached the parser.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// The schema document could not be retrieved.
    #[error("schema unavailable at {location}: {reason}")]
    Unavailable {
        /// Requested location.
        location: String,
        /// Underlying failure.
        reason: String,
    },

    /// IDL could not be compiled to a protocol.
    #[error("IDL compilation failed: {reason}")]
    Compilation {
        /// Underlying failure.
        reason: String,
    },
}

impl CollaboratorError {
    /// Creates a retrieval error.
    pub fn unavailable(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::Unavailable {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a compilation error.
    pub fn compilation(reason: impl ToString) -> Self {
        Self::Compilation {
            reason: reason.to_string(),
        }
    }
}

/// Error that aborts a whole pipeline run.
///
/// Per-target failures are reported in the run's outcomes instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Retrieval or compilation failed.
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    /// The schema or protocol document is invalid.
    #[error("schema parse error: {0}")]
    Parse(#[from] SchemaParseError),

    /// An artifact could not be rendered as JSON.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
