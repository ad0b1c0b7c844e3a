use simlit_model::{
    MemberResponse, Proposal, ProposalStatus, ReportStatus, ReviewerStatus, Role, User,
};

/// Every privileged action the workflow exposes.
///
/// The presentation layer renders exactly the actions this module permits;
/// it never repeats the underlying role or status comparisons itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    CreateProposal,
    EditProposal,
    DeleteProposal,
    RespondMembership,
    AssignReviewers,
    RespondReview,
    SubmitEvaluation,
    ApproveAsFacultyHead,
    ApproveAsDean,
    ApproveAsLppm,
    SubmitProgressReport,
    ApproveProgressAsFacultyHead,
    ApproveProgressAsDean,
    ApproveProgressAsLppm,
    UploadMonitoringDecree,
}

impl Action {
    /// Actions that make sense without an existing proposal.
    pub const CREATION: [Action; 1] = [Action::CreateProposal];

    /// Every proposal-scoped action, in display order.
    pub const PROPOSAL_SCOPED: [Action; 14] = [
        Action::EditProposal,
        Action::DeleteProposal,
        Action::RespondMembership,
        Action::AssignReviewers,
        Action::RespondReview,
        Action::SubmitEvaluation,
        Action::ApproveAsFacultyHead,
        Action::ApproveAsDean,
        Action::ApproveAsLppm,
        Action::SubmitProgressReport,
        Action::ApproveProgressAsFacultyHead,
        Action::ApproveProgressAsDean,
        Action::ApproveProgressAsLppm,
        Action::UploadMonitoringDecree,
    ];
}

/// Proposals may only be edited or deleted before the faculty takes over.
fn in_early_state(proposal: &Proposal) -> bool {
    matches!(
        proposal.status,
        ProposalStatus::Draft | ProposalStatus::WaitingMemberApproval
    )
}

fn report_status(proposal: &Proposal) -> Option<ReportStatus> {
    proposal.report_flow.as_ref().and_then(|flow| flow.status)
}

fn decree_uploaded(proposal: &Proposal) -> bool {
    proposal
        .report_flow
        .as_ref()
        .is_some_and(|flow| flow.monitoring_decree_url.is_some())
}

/// Pure permission predicate: does `user` get `action` on `proposal` now?
///
/// `proposal` is `None` only for [`Action::CreateProposal`]; every other
/// action on a missing proposal is denied. The check combines role
/// membership, per-proposal relationships, and the status gate of the
/// transition the action fires. It never panics and never mutates anything;
/// missing or partial data simply denies.
#[must_use]
pub fn can_perform(user: &User, action: Action, proposal: Option<&Proposal>) -> bool {
    let Some(proposal) = proposal else {
        return action == Action::CreateProposal && user.has_role(Role::Dosen);
    };
    match action {
        Action::CreateProposal => user.has_role(Role::Dosen),
        Action::EditProposal => proposal.is_chief(user.id) && in_early_state(proposal),
        Action::DeleteProposal => {
            (proposal.is_chief(user.id) || user.has_role(Role::Admin)) && in_early_state(proposal)
        }
        Action::RespondMembership => {
            proposal.status == ProposalStatus::WaitingMemberApproval
                && proposal
                    .member(user.id)
                    .is_some_and(|m| m.status == MemberResponse::Pending)
        }
        Action::AssignReviewers => {
            user.has_role(Role::KetuaPenelitianFakultas)
                && proposal.status == ProposalStatus::WaitingFacultyHead
        }
        Action::RespondReview => {
            proposal.status == ProposalStatus::WaitingReviewerResponse
                && proposal
                    .reviewer(user.id)
                    .is_some_and(|r| r.status == ReviewerStatus::Pending)
        }
        Action::SubmitEvaluation => {
            proposal.status == ProposalStatus::ReviewInProgress
                && proposal
                    .reviewer(user.id)
                    .is_some_and(|r| r.status == ReviewerStatus::Accepted && !r.is_evaluated)
        }
        Action::ApproveAsFacultyHead => {
            user.has_role(Role::KetuaPenelitianFakultas)
                && proposal.status == ProposalStatus::ReviewCompleted
        }
        Action::ApproveAsDean => {
            user.has_role(Role::Dekan) && proposal.status == ProposalStatus::WaitingDeanApproval
        }
        Action::ApproveAsLppm => {
            user.has_role(Role::KetuaLppm)
                && proposal.status == ProposalStatus::WaitingLppmApproval
        }
        Action::SubmitProgressReport => {
            proposal.is_chief(user.id)
                && proposal.status == ProposalStatus::Ongoing
                && report_status(proposal).is_none()
        }
        Action::ApproveProgressAsFacultyHead => {
            user.has_role(Role::KetuaPenelitianFakultas)
                && proposal.status == ProposalStatus::Ongoing
                && report_status(proposal) == Some(ReportStatus::LaporanDiuploadKetuaPeneliti)
        }
        Action::ApproveProgressAsDean => {
            user.has_role(Role::Dekan)
                && proposal.status == ProposalStatus::Ongoing
                && report_status(proposal)
                    == Some(ReportStatus::DisetujuiKetuaPenelitianFakultas)
        }
        Action::ApproveProgressAsLppm => {
            user.has_role(Role::KetuaLppm)
                && proposal.status == ProposalStatus::Ongoing
                && report_status(proposal) == Some(ReportStatus::DisetujuiDekan)
        }
        Action::UploadMonitoringDecree => {
            user.has_role(Role::KetuaLppm)
                && proposal.status == ProposalStatus::Ongoing
                && report_status(proposal) == Some(ReportStatus::DisetujuiKetuaLppm)
                && !decree_uploaded(proposal)
        }
    }
}

/// The proposal-scoped actions `user` may take right now.
///
/// This is the single source of truth the presentation layer renders
/// buttons from.
#[must_use]
pub fn permitted_actions(user: &User, proposal: &Proposal) -> Vec<Action> {
    Action::PROPOSAL_SCOPED
        .iter()
        .copied()
        .filter(|&action| can_perform(user, action, Some(proposal)))
        .collect()
}

/// Display filter for proposal lists: the user sees proposals they work on
/// or oversee. Never a security boundary; the backend pre-filters what it
/// returns.
#[must_use]
pub fn visible_to(user: &User, proposal: &Proposal) -> bool {
    proposal.is_chief(user.id)
        || proposal.member(user.id).is_some()
        || proposal.reviewer(user.id).is_some()
        || user.has_role(Role::KetuaPenelitianFakultas)
        || user.has_role(Role::Dekan)
        || user.has_role(Role::KetuaLppm)
        || user.has_role(Role::Admin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use simlit_model::{
        MemberRole, ProposalId, ProposalMember, ProposalReviewer, ReportApprovalFlow, UserId,
        UserType,
    };

    fn user(id: i64, roles: &[Role]) -> User {
        User::new(
            UserId(id),
            format!("user{id}"),
            format!("user{id}@kampus.ac.id"),
            UserType::DosenStaff,
            roles.iter().copied(),
        )
    }

    fn proposal(status: ProposalStatus) -> Proposal {
        Proposal {
            id: ProposalId(10),
            title: "Pemetaan Potensi Desa".into(),
            chief_researcher: user(1, &[Role::Dosen]),
            execution_period: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            funding_source: "Internal".into(),
            requested_amount: 15_000_000.0,
            research_outcome: "Jurnal".into(),
            partner_name: None,
            partner_address: None,
            partner_pic: None,
            document_url: None,
            status,
            members: vec![ProposalMember {
                user: user(2, &[Role::Dosen]),
                role_in_proposal: MemberRole::AnggotaDosen,
                status: MemberResponse::Pending,
            }],
            reviewers: Vec::new(),
            evaluations: Vec::new(),
            report_flow: None,
        }
    }

    #[test]
    fn only_dosen_can_create() {
        assert!(can_perform(&user(5, &[Role::Dosen]), Action::CreateProposal, None));
        assert!(!can_perform(&user(5, &[Role::Mahasiswa]), Action::CreateProposal, None));
    }

    #[test]
    fn dean_approval_is_status_gated() {
        let dean = user(9, &[Role::Dekan]);
        let ready = proposal(ProposalStatus::WaitingDeanApproval);
        let not_ready = proposal(ProposalStatus::ReviewCompleted);
        assert!(can_perform(&dean, Action::ApproveAsDean, Some(&ready)));
        assert!(!can_perform(&dean, Action::ApproveAsDean, Some(&not_ready)));
    }

    #[test]
    fn faculty_head_approves_only_after_review_completes() {
        let head = user(8, &[Role::KetuaPenelitianFakultas]);
        let done = proposal(ProposalStatus::ReviewCompleted);
        assert!(can_perform(&head, Action::ApproveAsFacultyHead, Some(&done)));
        let actions = permitted_actions(&head, &done);
        assert_eq!(actions, vec![Action::ApproveAsFacultyHead]);
    }

    #[test]
    fn edit_is_chief_only_and_early_only() {
        let chief = user(1, &[Role::Dosen]);
        let other = user(3, &[Role::Dosen]);
        let early = proposal(ProposalStatus::Draft);
        let late = proposal(ProposalStatus::ReviewInProgress);
        assert!(can_perform(&chief, Action::EditProposal, Some(&early)));
        assert!(!can_perform(&other, Action::EditProposal, Some(&early)));
        assert!(!can_perform(&chief, Action::EditProposal, Some(&late)));
    }

    #[test]
    fn admin_may_delete_early() {
        let admin = user(99, &[Role::Admin]);
        let early = proposal(ProposalStatus::WaitingMemberApproval);
        let late = proposal(ProposalStatus::Ongoing);
        assert!(can_perform(&admin, Action::DeleteProposal, Some(&early)));
        assert!(!can_perform(&admin, Action::DeleteProposal, Some(&late)));
    }

    #[test]
    fn pending_member_may_respond() {
        let member = user(2, &[Role::Dosen]);
        let p = proposal(ProposalStatus::WaitingMemberApproval);
        assert!(can_perform(&member, Action::RespondMembership, Some(&p)));

        let mut accepted = p.clone();
        accepted.members[0].status = MemberResponse::Accept;
        assert!(!can_perform(&member, Action::RespondMembership, Some(&accepted)));
    }

    #[test]
    fn evaluation_gate_follows_reviewer_record() {
        let reviewer = user(7, &[Role::Reviewer]);
        let mut p = proposal(ProposalStatus::ReviewInProgress);
        p.reviewers.push(ProposalReviewer {
            reviewer: reviewer.clone(),
            status: ReviewerStatus::Accepted,
            is_evaluated: false,
        });
        assert!(can_perform(&reviewer, Action::SubmitEvaluation, Some(&p)));

        p.reviewers[0].is_evaluated = true;
        assert!(!can_perform(&reviewer, Action::SubmitEvaluation, Some(&p)));
    }

    #[test]
    fn decree_upload_is_the_only_action_after_lppm_report_approval() {
        let lppm = user(4, &[Role::KetuaLppm]);
        let mut p = proposal(ProposalStatus::Ongoing);
        let mut flow = ReportApprovalFlow::empty();
        flow.status = Some(ReportStatus::DisetujuiKetuaLppm);
        p.report_flow = Some(flow);

        let actions = permitted_actions(&lppm, &p);
        assert_eq!(actions, vec![Action::UploadMonitoringDecree]);

        if let Some(flow) = p.report_flow.as_mut() {
            flow.monitoring_decree_url = Some("/files/sk.pdf".into());
        }
        assert!(permitted_actions(&lppm, &p).is_empty());
    }

    #[test]
    fn progress_report_only_before_first_upload() {
        let chief = user(1, &[Role::Dosen]);
        let mut p = proposal(ProposalStatus::Ongoing);
        assert!(can_perform(&chief, Action::SubmitProgressReport, Some(&p)));

        let mut flow = ReportApprovalFlow::empty();
        flow.status = Some(ReportStatus::LaporanDiuploadKetuaPeneliti);
        p.report_flow = Some(flow);
        assert!(!can_perform(&chief, Action::SubmitProgressReport, Some(&p)));
    }

    #[test]
    fn missing_proposal_denies_proposal_scoped_actions() {
        let dean = user(9, &[Role::Dekan]);
        assert!(!can_perform(&dean, Action::ApproveAsDean, None));
    }

    #[test]
    fn visibility_covers_team_and_oversight_roles() {
        let p = proposal(ProposalStatus::ReviewInProgress);
        assert!(visible_to(&user(1, &[Role::Dosen]), &p));
        assert!(visible_to(&user(2, &[Role::Dosen]), &p));
        assert!(visible_to(&user(40, &[Role::Dekan]), &p));
        assert!(!visible_to(&user(41, &[Role::Dosen]), &p));
    }
}
