//! Data model for the SIMLIT research-proposal workflow.
//!
//! Every type here mirrors the backend wire format: field names follow the
//! backend's camelCase Indonesian naming and enum variants serialize to the
//! backend's SCREAMING_SNAKE strings. The backend owns all canonical state;
//! these records are what a client observes, never what it mutates locally.

mod evaluation;
mod ids;
mod notification;
mod proposal;
mod report;
mod role;
mod user;
mod validation;

pub use evaluation::{ProposalEvaluation, ScoreSheet, SCORE_MAX, SCORE_MIN};
pub use ids::{EvaluationId, NotificationId, ProposalId, UserId};
pub use notification::{summarize, Notification, NotificationSummary};
pub use proposal::{
    MemberResponse, MemberRole, Proposal, ProposalDraft, ProposalMember, ProposalReviewer,
    ProposalStatus, ReviewerStatus, MAX_REVIEWERS,
};
pub use report::{ProgressReportDraft, ReportApprovalFlow, ReportStatus};
pub use role::{Role, UserType};
pub use user::{DosenProfile, StudentProfile, User};
pub use validation::FieldError;
