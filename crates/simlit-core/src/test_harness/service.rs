use crate::error::GatewayError;
use crate::gateway::ResearchGateway;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::RwLock;
use simlit_model::{
    EvaluationId, MemberResponse, MemberRole, Notification, NotificationId, ProgressReportDraft,
    Proposal, ProposalDraft, ProposalEvaluation, ProposalId, ProposalMember, ProposalReviewer,
    ProposalStatus, ReportApprovalFlow, ReportStatus, ReviewerStatus, Role, ScoreSheet, User,
    UserId,
};
use simlit_workflow::{
    advance_report, apply_event, recipients, report_approver, total_score, ProposalEvent,
    Recipient, ReportEvent, WorkflowTransition,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

/// Reference backend holding canonical workflow state in memory.
///
/// Transitions go through the same tables the client reads, so a lifecycle
/// driven against this service observes exactly the status sequence the
/// real backend promises. Notifications are enqueued per recipient on every
/// responsibility-changing transition.
pub struct InMemoryResearch {
    users: RwLock<HashMap<UserId, User>>,
    proposals: RwLock<HashMap<ProposalId, Proposal>>,
    feeds: DashMap<UserId, Vec<Notification>>,
    next_proposal: AtomicI64,
    next_evaluation: AtomicI64,
    next_notification: AtomicI64,
}

impl InMemoryResearch {
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            proposals: RwLock::new(HashMap::new()),
            feeds: DashMap::new(),
            next_proposal: AtomicI64::new(1),
            next_evaluation: AtomicI64::new(1),
            next_notification: AtomicI64::new(1),
        }
    }

    /// Registers a user the way an account provisioning flow would.
    pub fn seed_user(&self, user: User) {
        self.users.write().insert(user.id, user);
    }

    fn user(&self, id: UserId) -> Result<User, GatewayError> {
        self.users
            .read()
            .get(&id)
            .cloned()
            .ok_or(GatewayError::NotFound)
    }

    fn users_with_role(&self, role: Role) -> Vec<UserId> {
        let mut ids: Vec<_> = self
            .users
            .read()
            .values()
            .filter(|u| u.has_role(role))
            .map(|u| u.id)
            .collect();
        ids.sort();
        ids
    }

    /// Delivers one notification per distinct recipient of the transition.
    fn notify(&self, proposal: &Proposal, transition: WorkflowTransition, message: &str) {
        let mut targets: Vec<UserId> = Vec::new();
        for recipient in recipients(proposal, transition) {
            match recipient {
                Recipient::User(id) => targets.push(id),
                Recipient::Role(role) => targets.extend(self.users_with_role(role)),
            }
        }
        targets.sort();
        targets.dedup();
        for user_id in targets {
            let id = NotificationId(self.next_notification.fetch_add(1, Ordering::Relaxed));
            self.feeds.entry(user_id).or_default().push(Notification {
                id,
                message: message.to_string(),
                read: false,
                related_id: Some(proposal.id),
                created_at: Utc::now(),
            });
            tracing::debug!(notification = %id, user = %user_id, "notification enqueued");
        }
    }

    fn with_proposal<T>(
        &self,
        id: ProposalId,
        f: impl FnOnce(&mut Proposal) -> Result<T, GatewayError>,
    ) -> Result<T, GatewayError> {
        let mut proposals = self.proposals.write();
        let proposal = proposals.get_mut(&id).ok_or(GatewayError::NotFound)?;
        f(proposal)
    }

    fn rejected(message: impl Into<String>) -> GatewayError {
        GatewayError::Rejected(message.into())
    }
}

impl Default for InMemoryResearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResearchGateway for InMemoryResearch {
    async fn fetch_proposals(&self) -> Result<Vec<Proposal>, GatewayError> {
        let mut all: Vec<_> = self.proposals.read().values().cloned().collect();
        all.sort_by_key(|p| p.id);
        Ok(all)
    }

    async fn fetch_proposal(&self, id: ProposalId) -> Result<Proposal, GatewayError> {
        self.proposals
            .read()
            .get(&id)
            .cloned()
            .ok_or(GatewayError::NotFound)
    }

    async fn create_proposal(&self, draft: &ProposalDraft) -> Result<Proposal, GatewayError> {
        draft
            .validate()
            .map_err(|e| Self::rejected(format!("invalid proposal: {e:?}")))?;
        let chief_id = draft
            .chief_researcher_id
            .ok_or_else(|| Self::rejected("chief researcher missing"))?;
        let chief = self.user(chief_id)?;
        if !chief.has_role(Role::Dosen) {
            return Err(Self::rejected("chief researcher must be a lecturer"));
        }
        let execution_period = draft
            .execution_period
            .ok_or_else(|| Self::rejected("execution period missing"))?;
        let requested_amount = draft
            .requested_amount
            .ok_or_else(|| Self::rejected("requested amount missing"))?;

        let mut members = Vec::new();
        for id in &draft.dosen_member_ids {
            members.push(ProposalMember {
                user: self.user(*id)?,
                role_in_proposal: MemberRole::AnggotaDosen,
                status: MemberResponse::Pending,
            });
        }
        for id in &draft.student_member_ids {
            members.push(ProposalMember {
                user: self.user(*id)?,
                role_in_proposal: MemberRole::AnggotaMahasiswa,
                status: MemberResponse::Pending,
            });
        }

        let id = ProposalId(self.next_proposal.fetch_add(1, Ordering::Relaxed));
        let mut proposal = Proposal {
            id,
            title: draft.title.clone(),
            chief_researcher: chief,
            execution_period,
            funding_source: draft.funding_source.clone(),
            requested_amount,
            research_outcome: draft.research_outcome.clone(),
            partner_name: draft.partner_name.clone(),
            partner_address: draft.partner_address.clone(),
            partner_pic: draft.partner_pic.clone(),
            document_url: draft.document_url.clone(),
            status: ProposalStatus::Draft,
            members,
            reviewers: Vec::new(),
            evaluations: Vec::new(),
            report_flow: None,
        };

        // Submission is part of creation: the record lands in the members'
        // queues immediately.
        proposal.status = apply_event(proposal.status, ProposalEvent::Submitted)
            .map_err(|e| Self::rejected(e.to_string()))?;
        self.notify(
            &proposal,
            WorkflowTransition::Proposal(ProposalEvent::Submitted),
            "Anda diundang sebagai anggota penelitian",
        );

        self.proposals.write().insert(id, proposal.clone());
        tracing::info!(proposal = %id, "proposal created");
        Ok(proposal)
    }

    async fn update_proposal(
        &self,
        id: ProposalId,
        draft: &ProposalDraft,
    ) -> Result<Proposal, GatewayError> {
        draft
            .validate()
            .map_err(|e| Self::rejected(format!("invalid proposal: {e:?}")))?;
        self.with_proposal(id, |proposal| {
            if !matches!(
                proposal.status,
                ProposalStatus::Draft
                    | ProposalStatus::WaitingMemberApproval
            ) {
                return Err(Self::rejected("proposal can no longer be edited"));
            }
            proposal.title = draft.title.clone();
            if let Some(period) = draft.execution_period {
                proposal.execution_period = period;
            }
            proposal.funding_source = draft.funding_source.clone();
            if let Some(amount) = draft.requested_amount {
                proposal.requested_amount = amount;
            }
            proposal.research_outcome = draft.research_outcome.clone();
            proposal.partner_name = draft.partner_name.clone();
            proposal.partner_address = draft.partner_address.clone();
            proposal.partner_pic = draft.partner_pic.clone();
            if draft.document_url.is_some() {
                proposal.document_url = draft.document_url.clone();
            }
            Ok(proposal.clone())
        })
    }

    async fn delete_proposal(&self, id: ProposalId) -> Result<(), GatewayError> {
        let mut proposals = self.proposals.write();
        let proposal = proposals.get(&id).ok_or(GatewayError::NotFound)?;
        if !matches!(
            proposal.status,
            ProposalStatus::Draft
                | ProposalStatus::WaitingMemberApproval
        ) {
            return Err(Self::rejected("proposal is referenced by an active workflow"));
        }
        proposals.remove(&id);
        Ok(())
    }

    async fn respond_membership(
        &self,
        id: ProposalId,
        user_id: UserId,
        accept: bool,
    ) -> Result<(), GatewayError> {
        let (proposal, completed) = self.with_proposal(id, |proposal| {
            if proposal.status != ProposalStatus::WaitingMemberApproval {
                return Err(Self::rejected("membership phase is over"));
            }
            let member = proposal
                .members
                .iter_mut()
                .find(|m| m.user.id == user_id)
                .ok_or(GatewayError::NotFound)?;
            if member.status != MemberResponse::Pending {
                return Err(Self::rejected("membership already answered"));
            }
            member.status = if accept {
                MemberResponse::Accept
            } else {
                MemberResponse::Reject
            };
            let mut completed = false;
            if proposal.all_members_accepted() {
                proposal.status =
                    apply_event(proposal.status, ProposalEvent::AllMembersAccepted)
                        .map_err(|e| Self::rejected(e.to_string()))?;
                completed = true;
            }
            Ok((proposal.clone(), completed))
        })?;
        if completed {
            self.notify(
                &proposal,
                WorkflowTransition::Proposal(ProposalEvent::AllMembersAccepted),
                "Proposal baru menunggu penunjukan reviewer",
            );
        }
        Ok(())
    }

    async fn assign_reviewers(
        &self,
        id: ProposalId,
        reviewer_ids: &[UserId],
    ) -> Result<(), GatewayError> {
        let mut selected = Vec::new();
        for reviewer_id in reviewer_ids {
            selected.push(self.user(*reviewer_id)?);
        }
        let proposal = self.with_proposal(id, |proposal| {
            if proposal.status != ProposalStatus::WaitingFacultyHead {
                return Err(Self::rejected("proposal is not awaiting reviewer assignment"));
            }
            simlit_workflow::validate_assignment(proposal, &selected)
                .map_err(|e| Self::rejected(e.to_string()))?;
            proposal.reviewers = selected
                .iter()
                .cloned()
                .map(|reviewer| ProposalReviewer {
                    reviewer,
                    status: ReviewerStatus::Pending,
                    is_evaluated: false,
                })
                .collect();
            proposal.status = apply_event(proposal.status, ProposalEvent::ReviewersAssigned)
                .map_err(|e| Self::rejected(e.to_string()))?;
            proposal
                .check_invariants()
                .map_err(GatewayError::Rejected)?;
            Ok(proposal.clone())
        })?;
        self.notify(
            &proposal,
            WorkflowTransition::Proposal(ProposalEvent::ReviewersAssigned),
            "Anda ditunjuk sebagai reviewer proposal",
        );
        Ok(())
    }

    async fn respond_review(
        &self,
        id: ProposalId,
        reviewer_id: UserId,
        accept: bool,
    ) -> Result<(), GatewayError> {
        let (proposal, completed) = self.with_proposal(id, |proposal| {
            if proposal.status != ProposalStatus::WaitingReviewerResponse {
                return Err(Self::rejected("proposal is not awaiting reviewer responses"));
            }
            let row = proposal
                .reviewers
                .iter_mut()
                .find(|r| r.reviewer.id == reviewer_id)
                .ok_or(GatewayError::NotFound)?;
            if row.status != ReviewerStatus::Pending {
                return Err(Self::rejected("assignment already answered"));
            }
            row.status = if accept {
                ReviewerStatus::Accepted
            } else {
                // A rejection leaves the proposal waiting; the faculty head
                // resolves it outside this flow.
                ReviewerStatus::Rejected
            };
            let mut completed = false;
            if proposal.all_reviewers_accepted() {
                proposal.status =
                    apply_event(proposal.status, ProposalEvent::AllReviewersAccepted)
                        .map_err(|e| Self::rejected(e.to_string()))?;
                completed = true;
            }
            Ok((proposal.clone(), completed))
        })?;
        if completed {
            self.notify(
                &proposal,
                WorkflowTransition::Proposal(ProposalEvent::AllReviewersAccepted),
                "Proposal siap dinilai",
            );
        }
        Ok(())
    }

    async fn submit_evaluation(
        &self,
        id: ProposalId,
        reviewer_id: UserId,
        scores: &ScoreSheet,
        comment: Option<&str>,
    ) -> Result<f64, GatewayError> {
        scores
            .validate()
            .map_err(|e| Self::rejected(format!("invalid scores: {e:?}")))?;
        let comment = comment.map(str::to_string);
        let evaluation_id = EvaluationId(self.next_evaluation.fetch_add(1, Ordering::Relaxed));
        let (proposal, total, completed) = self.with_proposal(id, |proposal| {
            if proposal.status != ProposalStatus::ReviewInProgress {
                return Err(Self::rejected("proposal is not under review"));
            }
            let row = proposal
                .reviewers
                .iter_mut()
                .find(|r| r.reviewer.id == reviewer_id)
                .ok_or(GatewayError::NotFound)?;
            if row.status != ReviewerStatus::Accepted {
                return Err(Self::rejected("reviewer has not accepted the assignment"));
            }
            if row.is_evaluated {
                return Err(Self::rejected("evaluation already submitted"));
            }
            row.is_evaluated = true;
            let total = total_score(scores);
            proposal.evaluations.push(ProposalEvaluation {
                id: evaluation_id,
                proposal_id: id,
                reviewer_id,
                scores: *scores,
                comment,
                total,
                evaluated_at: Utc::now(),
            });
            let mut completed = false;
            if proposal.all_reviewers_evaluated() {
                proposal.status =
                    apply_event(proposal.status, ProposalEvent::AllEvaluationsSubmitted)
                        .map_err(|e| Self::rejected(e.to_string()))?;
                completed = true;
            }
            proposal
                .check_invariants()
                .map_err(GatewayError::Rejected)?;
            Ok((proposal.clone(), total, completed))
        })?;
        if completed {
            self.notify(
                &proposal,
                WorkflowTransition::Proposal(ProposalEvent::AllEvaluationsSubmitted),
                "Semua penilaian telah masuk, proposal menunggu persetujuan fakultas",
            );
        }
        Ok(total)
    }

    async fn approve_as_faculty_head(&self, id: ProposalId) -> Result<(), GatewayError> {
        let proposal = self.with_proposal(id, |proposal| {
            proposal.status = apply_event(proposal.status, ProposalEvent::FacultyHeadApproved)
                .map_err(|e| Self::rejected(e.to_string()))?;
            Ok(proposal.clone())
        })?;
        self.notify(
            &proposal,
            WorkflowTransition::Proposal(ProposalEvent::FacultyHeadApproved),
            "Proposal menunggu persetujuan dekan",
        );
        Ok(())
    }

    async fn approve_as_dean(&self, id: ProposalId) -> Result<(), GatewayError> {
        let proposal = self.with_proposal(id, |proposal| {
            proposal.status = apply_event(proposal.status, ProposalEvent::DeanApproved)
                .map_err(|e| Self::rejected(e.to_string()))?;
            // The dean's approval hands the proposal to LPPM in one go.
            proposal.status = apply_event(proposal.status, ProposalEvent::ForwardedToLppm)
                .map_err(|e| Self::rejected(e.to_string()))?;
            Ok(proposal.clone())
        })?;
        self.notify(
            &proposal,
            WorkflowTransition::Proposal(ProposalEvent::ForwardedToLppm),
            "Proposal menunggu persetujuan ketua LPPM",
        );
        Ok(())
    }

    async fn approve_as_lppm(&self, id: ProposalId) -> Result<(), GatewayError> {
        let proposal = self.with_proposal(id, |proposal| {
            proposal.status = apply_event(proposal.status, ProposalEvent::LppmApproved)
                .map_err(|e| Self::rejected(e.to_string()))?;
            // Institutional approval starts execution immediately and opens
            // the monitoring flow.
            proposal.status = apply_event(proposal.status, ProposalEvent::ExecutionStarted)
                .map_err(|e| Self::rejected(e.to_string()))?;
            proposal.report_flow = Some(ReportApprovalFlow::empty());
            Ok(proposal.clone())
        })?;
        self.notify(
            &proposal,
            WorkflowTransition::Proposal(ProposalEvent::ExecutionStarted),
            "Penelitian Anda disetujui dan mulai berjalan",
        );
        Ok(())
    }

    async fn submit_progress_report(
        &self,
        id: ProposalId,
        draft: &ProgressReportDraft,
    ) -> Result<(), GatewayError> {
        draft
            .validate()
            .map_err(|e| Self::rejected(format!("invalid progress report: {e:?}")))?;
        let proposal = self.with_proposal(id, |proposal| {
            if proposal.status != ProposalStatus::Ongoing {
                return Err(Self::rejected("proposal is not ongoing"));
            }
            let flow = proposal
                .report_flow
                .as_mut()
                .ok_or_else(|| Self::rejected("monitoring flow is not open"))?;
            if flow.status.is_some() {
                return Err(Self::rejected("progress report already submitted"));
            }
            flow.report_year = draft.report_year;
            flow.current_year_budget = draft.current_year_budget;
            flow.cumulative_budget = draft.cumulative_budget;
            flow.report_url = draft.report_file.clone();
            flow.status = Some(advance_report(None).map_err(|e| Self::rejected(e.to_string()))?);
            Ok(proposal.clone())
        })?;
        self.notify(
            &proposal,
            WorkflowTransition::Report(ReportEvent::ReportUploaded),
            "Laporan kemajuan menunggu persetujuan fakultas",
        );
        Ok(())
    }

    async fn approve_progress(&self, id: ProposalId, approver: Role) -> Result<(), GatewayError> {
        let (proposal, reached) = self.with_proposal(id, |proposal| {
            if proposal.status != ProposalStatus::Ongoing {
                return Err(Self::rejected("proposal is not ongoing"));
            }
            let flow = proposal
                .report_flow
                .as_mut()
                .ok_or_else(|| Self::rejected("monitoring flow is not open"))?;
            let next =
                advance_report(flow.status).map_err(|e| Self::rejected(e.to_string()))?;
            if report_approver(next) != Some(approver) {
                return Err(Self::rejected(format!(
                    "{approver} cannot approve the report at this step"
                )));
            }
            flow.status = Some(next);
            Ok((proposal.clone(), next))
        })?;
        let (event, message) = match reached {
            ReportStatus::DisetujuiKetuaPenelitianFakultas => (
                ReportEvent::FacultyHeadApproved,
                "Laporan kemajuan menunggu persetujuan dekan",
            ),
            ReportStatus::DisetujuiDekan => (
                ReportEvent::DeanApproved,
                "Laporan kemajuan menunggu persetujuan ketua LPPM",
            ),
            ReportStatus::DisetujuiKetuaLppm => (
                ReportEvent::LppmApproved,
                "Laporan kemajuan disetujui, menunggu SK pemantauan",
            ),
            ReportStatus::LaporanDiuploadKetuaPeneliti => {
                return Err(Self::rejected("upload is not an approval step"))
            }
        };
        self.notify(&proposal, WorkflowTransition::Report(event), message);
        Ok(())
    }

    async fn upload_monitoring_decree(
        &self,
        id: ProposalId,
        file_url: &str,
    ) -> Result<(), GatewayError> {
        let proposal = self.with_proposal(id, |proposal| {
            let flow = proposal
                .report_flow
                .as_mut()
                .ok_or_else(|| Self::rejected("monitoring flow is not open"))?;
            if flow.status != Some(ReportStatus::DisetujuiKetuaLppm) {
                return Err(Self::rejected("report is not ready for the decree"));
            }
            if flow.monitoring_decree_url.is_some() {
                return Err(Self::rejected("monitoring decree already uploaded"));
            }
            flow.monitoring_decree_url = Some(file_url.to_string());
            Ok(proposal.clone())
        })?;
        self.notify(
            &proposal,
            WorkflowTransition::Report(ReportEvent::MonitoringDecreeUploaded),
            "SK pemantauan telah diterbitkan",
        );
        Ok(())
    }

    async fn fetch_users(&self) -> Result<Vec<User>, GatewayError> {
        let mut all: Vec<_> = self.users.read().values().cloned().collect();
        all.sort_by_key(|u| u.id);
        Ok(all)
    }

    async fn fetch_notifications(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Notification>, GatewayError> {
        Ok(self
            .feeds
            .get(&user_id)
            .map(|feed| feed.value().clone())
            .unwrap_or_default())
    }

    async fn mark_notification_read(&self, id: NotificationId) -> Result<(), GatewayError> {
        for mut entry in self.feeds.iter_mut() {
            if let Some(n) = entry.value_mut().iter_mut().find(|n| n.id == id) {
                n.read = true;
                return Ok(());
            }
        }
        Err(GatewayError::NotFound)
    }
}
