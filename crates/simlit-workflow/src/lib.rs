//! Workflow core for research-proposal approval.
//!
//! Everything in this crate is a pure function over model records: the
//! canonical state machine, the progress-report chain, the role/permission
//! resolver, reviewer-assignment rules, the scoring engine, and notification
//! routing. No I/O happens here; the backend owns every transition and this
//! crate only decides what is legal and who acts next.

mod assignment;
mod error;
mod notify;
mod permission;
mod report_chain;
mod scoring;
mod state_machine;

pub use assignment::{validate_assignment, AssignmentError};
pub use error::{EvaluationError, TransitionError};
pub use notify::{recipients, Recipient, WorkflowTransition};
pub use permission::{can_perform, permitted_actions, visible_to, Action};
pub use report_chain::{advance_report, report_approver, ReportEvent};
pub use scoring::{
    average_total, round2, total_score, verify_backend_total, weighted_score, Criterion,
};
pub use state_machine::{
    allowed_transitions, apply_event, successor, validate_transition, ProposalEvent,
};
