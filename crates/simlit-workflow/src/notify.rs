use crate::report_chain::ReportEvent;
use crate::state_machine::ProposalEvent;
use simlit_model::{MemberResponse, Proposal, ReviewerStatus, Role, UserId};

/// Any status-advancing event across both machines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowTransition {
    Proposal(ProposalEvent),
    Report(ReportEvent),
}

/// Whom a transition makes responsible next.
///
/// Role recipients are resolved to concrete users by the backend; the model
/// only names the audience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recipient {
    Role(Role),
    User(UserId),
}

/// The parties to notify when `transition` fires on `proposal`.
///
/// Every transition that changes who must act next names that party here;
/// transitions the backend chains through automatically notify nobody.
#[must_use]
pub fn recipients(proposal: &Proposal, transition: WorkflowTransition) -> Vec<Recipient> {
    let chief = Recipient::User(proposal.chief_researcher.id);
    match transition {
        WorkflowTransition::Proposal(event) => match event {
            // Invited members must now accept or reject.
            ProposalEvent::Submitted => proposal
                .members
                .iter()
                .filter(|m| m.status == MemberResponse::Pending)
                .map(|m| Recipient::User(m.user.id))
                .collect(),
            ProposalEvent::AllMembersAccepted => {
                vec![Recipient::Role(Role::KetuaPenelitianFakultas)]
            }
            ProposalEvent::ReviewersAssigned => proposal
                .reviewers
                .iter()
                .filter(|r| r.status == ReviewerStatus::Pending)
                .map(|r| Recipient::User(r.reviewer.id))
                .collect(),
            // The accepted panel must now evaluate.
            ProposalEvent::AllReviewersAccepted => proposal
                .reviewers
                .iter()
                .filter(|r| r.status == ReviewerStatus::Accepted)
                .map(|r| Recipient::User(r.reviewer.id))
                .collect(),
            ProposalEvent::AllEvaluationsSubmitted => {
                vec![Recipient::Role(Role::KetuaPenelitianFakultas)]
            }
            ProposalEvent::FacultyHeadApproved => vec![Recipient::Role(Role::Dekan)],
            // The dean's approval is chained straight into the LPPM queue.
            ProposalEvent::DeanApproved => Vec::new(),
            ProposalEvent::ForwardedToLppm => vec![Recipient::Role(Role::KetuaLppm)],
            ProposalEvent::LppmApproved => vec![chief],
            ProposalEvent::ExecutionStarted => vec![chief],
            ProposalEvent::ProgressReportSubmitted => {
                vec![Recipient::Role(Role::KetuaPenelitianFakultas)]
            }
            ProposalEvent::ProgressApproved => vec![chief],
            ProposalEvent::FinalReportSubmitted => vec![Recipient::Role(Role::Dekan)],
            ProposalEvent::FinalDeanApproved => vec![Recipient::Role(Role::KetuaLppm)],
            ProposalEvent::FinalLppmApproved => vec![chief],
            ProposalEvent::Closed => vec![chief],
        },
        WorkflowTransition::Report(event) => match event {
            ReportEvent::ReportUploaded => {
                vec![Recipient::Role(Role::KetuaPenelitianFakultas)]
            }
            ReportEvent::FacultyHeadApproved => vec![Recipient::Role(Role::Dekan)],
            ReportEvent::DeanApproved => vec![Recipient::Role(Role::KetuaLppm)],
            // LPPM both learns of its own approval step's follow-up duty and
            // the chief researcher sees progress.
            ReportEvent::LppmApproved => vec![Recipient::Role(Role::KetuaLppm), chief],
            ReportEvent::MonitoringDecreeUploaded => vec![chief],
        },
    }
}
