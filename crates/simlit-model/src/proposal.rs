use crate::evaluation::ProposalEvaluation;
use crate::ids::{ProposalId, UserId};
use crate::report::ReportApprovalFlow;
use crate::user::User;
use crate::validation::FieldError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Upper bound on reviewers the faculty head may assign to one proposal.
pub const MAX_REVIEWERS: usize = 2;

/// Canonical proposal lifecycle statuses, in lifecycle order.
///
/// The backend owns every transition; the client only ever reads this value
/// and decides which actions to expose. There is no backward edge and no
/// explicit rejected status: a rejection removes the proposal from the
/// relevant actor queues while the status stays put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProposalStatus {
    Draft,
    WaitingMemberApproval,
    WaitingFacultyHead,
    WaitingReviewerResponse,
    ReviewInProgress,
    ReviewCompleted,
    WaitingDeanApproval,
    ApprovedByDean,
    WaitingLppmApproval,
    LppmApproved,
    Ongoing,
    ProgressReportSubmitted,
    ProgressApproved,
    FinalReportSubmitted,
    FinalApprovedByDean,
    FinalApprovedByLppm,
    Completed,
}

impl ProposalStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [ProposalStatus; 17] = [
        ProposalStatus::Draft,
        ProposalStatus::WaitingMemberApproval,
        ProposalStatus::WaitingFacultyHead,
        ProposalStatus::WaitingReviewerResponse,
        ProposalStatus::ReviewInProgress,
        ProposalStatus::ReviewCompleted,
        ProposalStatus::WaitingDeanApproval,
        ProposalStatus::ApprovedByDean,
        ProposalStatus::WaitingLppmApproval,
        ProposalStatus::LppmApproved,
        ProposalStatus::Ongoing,
        ProposalStatus::ProgressReportSubmitted,
        ProposalStatus::ProgressApproved,
        ProposalStatus::FinalReportSubmitted,
        ProposalStatus::FinalApprovedByDean,
        ProposalStatus::FinalApprovedByLppm,
        ProposalStatus::Completed,
    ];

    /// Whether the lifecycle has reached its end.
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProposalStatus::Completed)
    }
}

impl std::fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Display matches the wire string so logs read like backend payloads.
        let s = match self {
            ProposalStatus::Draft => "DRAFT",
            ProposalStatus::WaitingMemberApproval => "WAITING_MEMBER_APPROVAL",
            ProposalStatus::WaitingFacultyHead => "WAITING_FACULTY_HEAD",
            ProposalStatus::WaitingReviewerResponse => "WAITING_REVIEWER_RESPONSE",
            ProposalStatus::ReviewInProgress => "REVIEW_IN_PROGRESS",
            ProposalStatus::ReviewCompleted => "REVIEW_COMPLETED",
            ProposalStatus::WaitingDeanApproval => "WAITING_DEAN_APPROVAL",
            ProposalStatus::ApprovedByDean => "APPROVED_BY_DEAN",
            ProposalStatus::WaitingLppmApproval => "WAITING_LPPM_APPROVAL",
            ProposalStatus::LppmApproved => "LPPM_APPROVED",
            ProposalStatus::Ongoing => "ONGOING",
            ProposalStatus::ProgressReportSubmitted => "PROGRESS_REPORT_SUBMITTED",
            ProposalStatus::ProgressApproved => "PROGRESS_APPROVED",
            ProposalStatus::FinalReportSubmitted => "FINAL_REPORT_SUBMITTED",
            ProposalStatus::FinalApprovedByDean => "FINAL_APPROVED_BY_DEAN",
            ProposalStatus::FinalApprovedByLppm => "FINAL_APPROVED_BY_LPPM",
            ProposalStatus::Completed => "COMPLETED",
        };
        f.write_str(s)
    }
}

/// Role a member plays inside one proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberRole {
    #[serde(rename = "ANGGOTA_DOSEN")]
    AnggotaDosen,
    #[serde(rename = "ANGGOTA_MAHASISWA")]
    AnggotaMahasiswa,
}

/// A member's response to the invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberResponse {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "ACCEPT")]
    Accept,
    #[serde(rename = "REJECT")]
    Reject,
}

/// Join record linking a proposal to an invited member.
///
/// Immutable once the proposal leaves the membership-confirmation phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalMember {
    pub user: User,
    #[serde(rename = "roleInProposal")]
    pub role_in_proposal: MemberRole,
    pub status: MemberResponse,
}

/// A reviewer's response to the assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReviewerStatus {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "ACCEPTED")]
    Accepted,
    #[serde(rename = "REJECTED")]
    Rejected,
}

/// Join record linking a proposal to an assigned reviewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalReviewer {
    pub reviewer: User,
    pub status: ReviewerStatus,
    #[serde(rename = "isEvaluated")]
    pub is_evaluated: bool,
}

/// One research proposal as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    #[serde(rename = "judul")]
    pub title: String,
    #[serde(rename = "ketuaPeneliti")]
    pub chief_researcher: User,
    #[serde(rename = "waktuPelaksanaan")]
    pub execution_period: NaiveDate,
    #[serde(rename = "sumberDana")]
    pub funding_source: String,
    #[serde(rename = "danaYangDiUsulkan")]
    pub requested_amount: f64,
    #[serde(rename = "luaranPenelitian")]
    pub research_outcome: String,
    #[serde(rename = "namaMitra", default, skip_serializing_if = "Option::is_none")]
    pub partner_name: Option<String>,
    #[serde(rename = "alamatMitra", default, skip_serializing_if = "Option::is_none")]
    pub partner_address: Option<String>,
    #[serde(rename = "picMitra", default, skip_serializing_if = "Option::is_none")]
    pub partner_pic: Option<String>,
    #[serde(rename = "fileUrl", default, skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
    pub status: ProposalStatus,
    #[serde(rename = "proposalMember", default)]
    pub members: Vec<ProposalMember>,
    #[serde(rename = "proposalReviewer", default)]
    pub reviewers: Vec<ProposalReviewer>,
    #[serde(rename = "proposalEvaluation", default)]
    pub evaluations: Vec<ProposalEvaluation>,
    #[serde(
        rename = "reportApprovalFlow",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub report_flow: Option<ReportApprovalFlow>,
}

impl Proposal {
    /// Whether the given user is the chief researcher.
    #[inline]
    #[must_use]
    pub fn is_chief(&self, user_id: UserId) -> bool {
        self.chief_researcher.id == user_id
    }

    /// The member record for a user, if they were invited.
    #[must_use]
    pub fn member(&self, user_id: UserId) -> Option<&ProposalMember> {
        self.members.iter().find(|m| m.user.id == user_id)
    }

    /// The reviewer record for a user, if they were assigned.
    #[must_use]
    pub fn reviewer(&self, user_id: UserId) -> Option<&ProposalReviewer> {
        self.reviewers.iter().find(|r| r.reviewer.id == user_id)
    }

    /// Ids of every lecturer on the research team, chief included. Reviewer
    /// assignment must exclude all of them.
    #[must_use]
    pub fn dosen_team_ids(&self) -> Vec<UserId> {
        let mut ids = vec![self.chief_researcher.id];
        ids.extend(
            self.members
                .iter()
                .filter(|m| m.role_in_proposal == MemberRole::AnggotaDosen)
                .map(|m| m.user.id),
        );
        ids
    }

    /// True once every invited member has accepted.
    #[must_use]
    pub fn all_members_accepted(&self) -> bool {
        !self.members.is_empty()
            && self
                .members
                .iter()
                .all(|m| m.status == MemberResponse::Accept)
    }

    /// True once every assigned reviewer has accepted.
    #[must_use]
    pub fn all_reviewers_accepted(&self) -> bool {
        !self.reviewers.is_empty()
            && self
                .reviewers
                .iter()
                .all(|r| r.status == ReviewerStatus::Accepted)
    }

    /// True once every accepted reviewer has submitted an evaluation.
    #[must_use]
    pub fn all_reviewers_evaluated(&self) -> bool {
        let accepted: Vec<_> = self
            .reviewers
            .iter()
            .filter(|r| r.status == ReviewerStatus::Accepted)
            .collect();
        !accepted.is_empty() && accepted.iter().all(|r| r.is_evaluated)
    }

    /// Structural invariants every well-formed proposal record satisfies.
    ///
    /// The backend enforces these; the in-process harness re-checks them and
    /// tests assert them on every observed record.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self
            .reviewers
            .iter()
            .any(|r| r.reviewer.id == self.chief_researcher.id)
        {
            return Err("chief researcher cannot review their own proposal".into());
        }
        if self.evaluations.len() > self.reviewers.len() {
            return Err("more evaluations than assigned reviewers".into());
        }
        if self.reviewers.len() > MAX_REVIEWERS {
            return Err(format!("more than {MAX_REVIEWERS} reviewers assigned"));
        }
        Ok(())
    }
}

/// Form payload for creating or updating a proposal.
///
/// Validation mirrors the submission form: every failing field is reported,
/// and nothing is sent to the backend until the draft is clean.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProposalDraft {
    #[serde(rename = "judul")]
    pub title: String,
    #[serde(rename = "ketuaPeneliti")]
    pub chief_researcher_id: Option<UserId>,
    #[serde(rename = "anggotaDosen")]
    pub dosen_member_ids: Vec<UserId>,
    #[serde(rename = "anggotaMahasiswa")]
    pub student_member_ids: Vec<UserId>,
    #[serde(rename = "waktuPelaksanaan")]
    pub execution_period: Option<NaiveDate>,
    #[serde(rename = "sumberDana")]
    pub funding_source: String,
    #[serde(rename = "danaYangDiUsulkan")]
    pub requested_amount: Option<f64>,
    #[serde(rename = "luaranPenelitian")]
    pub research_outcome: String,
    #[serde(rename = "namaMitra", skip_serializing_if = "Option::is_none")]
    pub partner_name: Option<String>,
    #[serde(rename = "alamatMitra", skip_serializing_if = "Option::is_none")]
    pub partner_address: Option<String>,
    #[serde(rename = "picMitra", skip_serializing_if = "Option::is_none")]
    pub partner_pic: Option<String>,
    #[serde(rename = "fileUrl", skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
}

impl ProposalDraft {
    /// Field-by-field validation. Partner fields are optional.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push(FieldError::new("judul", "title is required"));
        }
        if self.chief_researcher_id.is_none() {
            errors.push(FieldError::new("ketuaPeneliti", "chief researcher is required"));
        }
        if self.dosen_member_ids.is_empty() {
            errors.push(FieldError::new(
                "anggotaDosen",
                "at least one lecturer member is required",
            ));
        }
        if self.execution_period.is_none() {
            errors.push(FieldError::new(
                "waktuPelaksanaan",
                "execution period is required",
            ));
        }
        if self.funding_source.trim().is_empty() {
            errors.push(FieldError::new("sumberDana", "funding source is required"));
        }
        match self.requested_amount {
            None => errors.push(FieldError::new(
                "danaYangDiUsulkan",
                "requested amount is required",
            )),
            Some(amount) if amount < 0.0 => errors.push(FieldError::new(
                "danaYangDiUsulkan",
                "requested amount must not be negative",
            )),
            Some(_) => {}
        }
        if self.research_outcome.trim().is_empty() {
            errors.push(FieldError::new(
                "luaranPenelitian",
                "research outcome is required",
            ));
        }
        if let Some(chief) = self.chief_researcher_id {
            if self.dosen_member_ids.contains(&chief) {
                errors.push(FieldError::new(
                    "anggotaDosen",
                    "chief researcher cannot also be listed as a member",
                ));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::{Role, UserType};

    fn dosen(id: i64) -> User {
        User::new(
            UserId(id),
            format!("dosen{id}"),
            format!("dosen{id}@kampus.ac.id"),
            UserType::DosenStaff,
            [Role::Dosen],
        )
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    fn minimal_proposal() -> Proposal {
        Proposal {
            id: ProposalId(1),
            title: "Kajian Energi Terbarukan".into(),
            chief_researcher: dosen(1),
            execution_period: date(),
            funding_source: "Internal".into(),
            requested_amount: 25_000_000.0,
            research_outcome: "Jurnal nasional".into(),
            partner_name: None,
            partner_address: None,
            partner_pic: None,
            document_url: None,
            status: ProposalStatus::WaitingMemberApproval,
            members: vec![ProposalMember {
                user: dosen(2),
                role_in_proposal: MemberRole::AnggotaDosen,
                status: MemberResponse::Pending,
            }],
            reviewers: Vec::new(),
            evaluations: Vec::new(),
            report_flow: None,
        }
    }

    #[test]
    fn status_serializes_to_wire_strings() {
        let json = serde_json::to_string(&ProposalStatus::WaitingFacultyHead).unwrap();
        assert_eq!(json, "\"WAITING_FACULTY_HEAD\"");
        let back: ProposalStatus = serde_json::from_str("\"REVIEW_IN_PROGRESS\"").unwrap();
        assert_eq!(back, ProposalStatus::ReviewInProgress);
    }

    #[test]
    fn status_order_matches_lifecycle() {
        assert!(ProposalStatus::Draft < ProposalStatus::WaitingFacultyHead);
        assert!(ProposalStatus::Ongoing < ProposalStatus::Completed);
        assert_eq!(ProposalStatus::ALL.len(), 17);
    }

    #[test]
    fn membership_completion_requires_every_accept() {
        let mut p = minimal_proposal();
        assert!(!p.all_members_accepted());
        p.members[0].status = MemberResponse::Accept;
        assert!(p.all_members_accepted());
        p.members.clear();
        assert!(!p.all_members_accepted());
    }

    #[test]
    fn chief_cannot_be_reviewer_invariant() {
        let mut p = minimal_proposal();
        p.reviewers.push(ProposalReviewer {
            reviewer: dosen(1),
            status: ReviewerStatus::Pending,
            is_evaluated: false,
        });
        assert!(p.check_invariants().is_err());
    }

    #[test]
    fn draft_validation_reports_every_missing_field() {
        let draft = ProposalDraft::default();
        let errors = draft.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert!(fields.contains(&"judul"));
        assert!(fields.contains(&"ketuaPeneliti"));
        assert!(fields.contains(&"anggotaDosen"));
        assert!(fields.contains(&"waktuPelaksanaan"));
        assert!(fields.contains(&"sumberDana"));
        assert!(fields.contains(&"danaYangDiUsulkan"));
        assert!(fields.contains(&"luaranPenelitian"));
    }

    #[test]
    fn draft_validation_accepts_complete_form() {
        let draft = ProposalDraft {
            title: "Analisis Jaringan Kampus".into(),
            chief_researcher_id: Some(UserId(1)),
            dosen_member_ids: vec![UserId(2)],
            student_member_ids: vec![UserId(9)],
            execution_period: Some(date()),
            funding_source: "Hibah Fakultas".into(),
            requested_amount: Some(10_000_000.0),
            research_outcome: "Prototipe".into(),
            ..ProposalDraft::default()
        };
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn draft_rejects_chief_listed_as_member() {
        let draft = ProposalDraft {
            title: "X".into(),
            chief_researcher_id: Some(UserId(1)),
            dosen_member_ids: vec![UserId(1)],
            execution_period: Some(date()),
            funding_source: "Internal".into(),
            requested_amount: Some(0.0),
            research_outcome: "Laporan".into(),
            ..ProposalDraft::default()
        };
        let errors = draft.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "anggotaDosen"));
    }
}
