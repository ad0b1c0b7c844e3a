//! Testing utilities for the SIMLIT workspace.
//!
//! Shared fixtures and scenario drivers on top of the in-process reference
//! backend.

use chrono::NaiveDate;
use simlit_core::{ClientError, WorkflowClient};
use simlit_model::{ProgressReportDraft, Proposal, ProposalDraft, ScoreSheet};

pub use simlit_core::test_harness::{standard_cast, Cast, InMemoryResearch};

/// A complete, valid proposal draft authored by the cast's chief.
#[must_use]
pub fn complete_draft(cast: &Cast) -> ProposalDraft {
    ProposalDraft {
        title: "Peningkatan Ketahanan Pangan Lokal".into(),
        chief_researcher_id: Some(cast.chief.id),
        dosen_member_ids: vec![cast.dosen_member.id],
        student_member_ids: vec![cast.student_member.id],
        execution_period: NaiveDate::from_ymd_opt(2026, 8, 1),
        funding_source: "Hibah Internal".into(),
        requested_amount: Some(25_000_000.0),
        research_outcome: "Jurnal nasional".into(),
        ..ProposalDraft::default()
    }
}

/// A complete, valid progress-report draft.
#[must_use]
pub fn complete_report_draft() -> ProgressReportDraft {
    ProgressReportDraft {
        report_year: NaiveDate::from_ymd_opt(2027, 1, 1),
        current_year_budget: Some(10_000_000.0),
        cumulative_budget: Some(25_000_000.0),
        report_file: Some("/files/laporan-kemajuan.pdf".into()),
    }
}

/// Drives a fresh proposal through membership, review, and every approval
/// until it is ONGOING. Scenario tests build on this known-good happy path.
pub async fn drive_to_ongoing(
    cast: &Cast,
    client: &WorkflowClient<InMemoryResearch>,
) -> Result<Proposal, ClientError> {
    let p = client.create_proposal(&cast.chief, &complete_draft(cast)).await?;
    let p = client.respond_membership(&cast.dosen_member, &p, true).await?;
    let p = client.respond_membership(&cast.student_member, &p, true).await?;
    let p = client
        .assign_reviewers(
            &cast.faculty_head,
            &p,
            &[cast.reviewer_one.clone(), cast.reviewer_two.clone()],
        )
        .await?;
    let p = client.respond_review(&cast.reviewer_one, &p, true).await?;
    let p = client.respond_review(&cast.reviewer_two, &p, true).await?;
    let p = client
        .submit_evaluation(&cast.reviewer_one, &p, &ScoreSheet::uniform(82.0), None)
        .await?;
    let p = client
        .submit_evaluation(&cast.reviewer_two, &p, &ScoreSheet::uniform(76.0), None)
        .await?;
    let p = client.approve_as_faculty_head(&cast.faculty_head, &p).await?;
    let p = client.approve_as_dean(&cast.dean, &p).await?;
    client.approve_as_lppm(&cast.lppm_head, &p).await
}
