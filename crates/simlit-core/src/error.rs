use simlit_model::FieldError;
use simlit_workflow::{Action, AssignmentError, EvaluationError};

/// Failures at the backend boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GatewayError {
    /// Network or transport failure. The action stays retryable; nothing
    /// observable changed.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The backend refused the request.
    #[error("backend rejected the request: {0}")]
    Rejected(String),

    /// The referenced record does not exist on the backend.
    #[error("record not found")]
    NotFound,
}

impl GatewayError {
    /// Only transport failures are worth retrying as-is.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::Transport(_))
    }
}

/// Failures surfaced by the workflow client, in the order they are checked:
/// local validation, permission, then the backend call itself.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// The form is incomplete or malformed; nothing was sent.
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// The action is not permitted for this user in the proposal's current
    /// state. Reaching the backend with such a request is a logic defect,
    /// so the client refuses before dispatch.
    #[error("action {action:?} is not permitted here")]
    PermissionDenied { action: Action },

    /// Reviewer selection broke an assignment rule.
    #[error(transparent)]
    Assignment(#[from] AssignmentError),

    /// Evaluation submission broke a scoring rule.
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    /// The backend call itself failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl ClientError {
    /// Whether retrying the same call unchanged can succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Gateway(e) if e.is_retryable())
    }
}

/// Failures establishing a session.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("authentication token is expired")]
    TokenExpired,
}
