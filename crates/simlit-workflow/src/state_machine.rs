use crate::error::TransitionError;
use simlit_model::ProposalStatus;

/// Events that drive the proposal lifecycle forward.
///
/// Each event is legal in exactly one status and fires exactly one forward
/// transition. The backend applies them; the client uses this table to
/// interpret observed status changes and to predict the post-action status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProposalEvent {
    /// Chief researcher submits the draft to the invited members.
    Submitted,
    /// Every invited member accepted the invitation.
    AllMembersAccepted,
    /// Faculty head assigned the reviewer panel.
    ReviewersAssigned,
    /// Every assigned reviewer accepted the assignment.
    AllReviewersAccepted,
    /// Every accepted reviewer submitted an evaluation.
    AllEvaluationsSubmitted,
    /// Faculty head signed off on the completed review.
    FacultyHeadApproved,
    /// Dean approved the proposal.
    DeanApproved,
    /// Dean's approval handed the proposal to LPPM.
    ForwardedToLppm,
    /// LPPM head gave the institutional approval.
    LppmApproved,
    /// Research execution started.
    ExecutionStarted,
    /// Chief researcher submitted the yearly progress report.
    ProgressReportSubmitted,
    /// Monitoring chain finished for the progress report.
    ProgressApproved,
    /// Chief researcher submitted the final report.
    FinalReportSubmitted,
    /// Dean approved the final report.
    FinalDeanApproved,
    /// LPPM head approved the final report.
    FinalLppmApproved,
    /// Administration closed out the research.
    Closed,
}

/// The single forward successor of a status, if any.
#[must_use]
pub fn successor(from: ProposalStatus) -> Option<ProposalStatus> {
    use ProposalStatus::*;
    match from {
        Draft => Some(WaitingMemberApproval),
        WaitingMemberApproval => Some(WaitingFacultyHead),
        WaitingFacultyHead => Some(WaitingReviewerResponse),
        WaitingReviewerResponse => Some(ReviewInProgress),
        ReviewInProgress => Some(ReviewCompleted),
        ReviewCompleted => Some(WaitingDeanApproval),
        WaitingDeanApproval => Some(ApprovedByDean),
        ApprovedByDean => Some(WaitingLppmApproval),
        WaitingLppmApproval => Some(LppmApproved),
        LppmApproved => Some(Ongoing),
        Ongoing => Some(ProgressReportSubmitted),
        ProgressReportSubmitted => Some(ProgressApproved),
        ProgressApproved => Some(FinalReportSubmitted),
        FinalReportSubmitted => Some(FinalApprovedByDean),
        FinalApprovedByDean => Some(FinalApprovedByLppm),
        FinalApprovedByLppm => Some(Completed),
        Completed => None,
    }
}

/// Statuses reachable in one step. The lifecycle is linear, so this is
/// always zero or one entries; rejections never move the status backward.
#[must_use]
pub fn allowed_transitions(from: ProposalStatus) -> Vec<ProposalStatus> {
    successor(from).into_iter().collect()
}

/// Validates a single-step transition.
pub fn validate_transition(
    from: ProposalStatus,
    to: ProposalStatus,
) -> Result<(), TransitionError> {
    if from.is_terminal() {
        return Err(TransitionError::Terminal(from));
    }
    if successor(from) == Some(to) {
        Ok(())
    } else {
        Err(TransitionError::Illegal { from, to })
    }
}

/// The status an event fires from.
fn source(event: ProposalEvent) -> ProposalStatus {
    use ProposalEvent as E;
    use ProposalStatus as S;
    match event {
        E::Submitted => S::Draft,
        E::AllMembersAccepted => S::WaitingMemberApproval,
        E::ReviewersAssigned => S::WaitingFacultyHead,
        E::AllReviewersAccepted => S::WaitingReviewerResponse,
        E::AllEvaluationsSubmitted => S::ReviewInProgress,
        E::FacultyHeadApproved => S::ReviewCompleted,
        E::DeanApproved => S::WaitingDeanApproval,
        E::ForwardedToLppm => S::ApprovedByDean,
        E::LppmApproved => S::WaitingLppmApproval,
        E::ExecutionStarted => S::LppmApproved,
        E::ProgressReportSubmitted => S::Ongoing,
        E::ProgressApproved => S::ProgressReportSubmitted,
        E::FinalReportSubmitted => S::ProgressApproved,
        E::FinalDeanApproved => S::FinalReportSubmitted,
        E::FinalLppmApproved => S::FinalApprovedByDean,
        E::Closed => S::FinalApprovedByLppm,
    }
}

/// Applies an event to a status, yielding the next status.
///
/// Errors when the event's gating action is not available in `status`; no
/// event ever skips an intermediate state.
pub fn apply_event(
    status: ProposalStatus,
    event: ProposalEvent,
) -> Result<ProposalStatus, TransitionError> {
    if source(event) != status {
        return Err(TransitionError::EventNotApplicable { status });
    }
    match successor(status) {
        Some(next) => Ok(next),
        None => Err(TransitionError::Terminal(status)),
    }
}
