use simlit_model::{FieldError, ProposalStatus, ReportStatus, UserId};

/// State-machine violations, for the proposal lifecycle and for the
/// progress-report chain alike.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransitionError {
    /// The requested edge does not exist in the lifecycle.
    #[error("illegal transition {from} -> {to}")]
    Illegal {
        from: ProposalStatus,
        to: ProposalStatus,
    },

    /// No transition leaves a terminal status.
    #[error("{0} is terminal")]
    Terminal(ProposalStatus),

    /// The event's gating action is not available in the current status.
    #[error("event not applicable in status {status}")]
    EventNotApplicable { status: ProposalStatus },

    /// The report chain only moves one step at a time, in order.
    #[error("report chain cannot advance past {0:?}")]
    ReportChainComplete(Option<ReportStatus>),
}

/// Rejections of an evaluation submission.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    /// One evaluation per reviewer per proposal.
    #[error("reviewer {0} already submitted an evaluation")]
    AlreadyEvaluated(UserId),

    /// Raw scores outside the rubric range.
    #[error("invalid scores: {0:?}")]
    InvalidScores(Vec<FieldError>),

    /// Locally computed total disagrees with the backend's.
    #[error("total mismatch: computed {computed}, backend {backend}")]
    TotalMismatch { computed: f64, backend: f64 },
}
