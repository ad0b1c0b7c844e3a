//! Cross-module scenarios: the permission gate and the transition table
//! agreeing on what each approval step does.

use chrono::NaiveDate;
use simlit_model::{
    MemberResponse, MemberRole, Proposal, ProposalId, ProposalMember, ProposalStatus, Role, User,
    UserId, UserType,
};
use simlit_workflow::{apply_event, can_perform, Action, ProposalEvent};

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
        id: ProposalId(1),
        title: "Optimalisasi Lahan Kering".into(),
        chief_researcher: user(1, &[Role::Dosen]),
        execution_period: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
        funding_source: "Internal".into(),
        requested_amount: 12_000_000.0,
        research_outcome: "Jurnal".into(),
        partner_name: None,
        partner_address: None,
        partner_pic: None,
        document_url: None,
        status,
        members: vec![ProposalMember {
            user: user(2, &[Role::Dosen]),
            role_in_proposal: MemberRole::AnggotaDosen,
            status: MemberResponse::Accept,
        }],
        reviewers: Vec::new(),
        evaluations: Vec::new(),
        report_flow: None,
    }
}

#[test]
fn faculty_head_approval_lands_in_the_dean_queue() {
    let head = user(6, &[Role::KetuaPenelitianFakultas]);
    let p = proposal(ProposalStatus::ReviewCompleted);

    assert!(can_perform(&head, Action::ApproveAsFacultyHead, Some(&p)));
    let next = apply_event(p.status, ProposalEvent::FacultyHeadApproved).unwrap();
    assert_eq!(next, ProposalStatus::WaitingDeanApproval);

    // The same user cannot act again once the status moved on.
    let mut moved = p;
    moved.status = next;
    assert!(!can_perform(&head, Action::ApproveAsFacultyHead, Some(&moved)));
}

#[test]
fn each_approval_role_is_locked_to_its_own_queue() {
    let head = user(6, &[Role::KetuaPenelitianFakultas]);
    let dean = user(7, &[Role::Dekan]);
    let lppm = user(8, &[Role::KetuaLppm]);

    for status in ProposalStatus::ALL {
        let p = proposal(status);
        assert_eq!(
            can_perform(&head, Action::ApproveAsFacultyHead, Some(&p)),
            status == ProposalStatus::ReviewCompleted
        );
        assert_eq!(
            can_perform(&dean, Action::ApproveAsDean, Some(&p)),
            status == ProposalStatus::WaitingDeanApproval
        );
        assert_eq!(
            can_perform(&lppm, Action::ApproveAsLppm, Some(&p)),
            status == ProposalStatus::WaitingLppmApproval
        );
    }
}

#[test]
fn holding_every_role_still_respects_the_status_gate() {
    let super_user = user(
        9,
        &[
            Role::Dosen,
            Role::Reviewer,
            Role::KetuaPenelitianFakultas,
            Role::Dekan,
            Role::KetuaLppm,
        ],
    );
    let p = proposal(ProposalStatus::WaitingFacultyHead);
    assert!(can_perform(&super_user, Action::AssignReviewers, Some(&p)));
    assert!(!can_perform(&super_user, Action::ApproveAsDean, Some(&p)));
    assert!(!can_perform(&super_user, Action::ApproveAsLppm, Some(&p)));
}
