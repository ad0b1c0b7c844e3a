use crate::error::ClientError;
use crate::gateway::ResearchGateway;
use simlit_model::{
    Notification, ProgressReportDraft, Proposal, ProposalDraft, ProposalId, Role, ScoreSheet,
    User,
};
use simlit_workflow::{
    can_perform, validate_assignment, verify_backend_total, Action, EvaluationError,
};
use std::sync::Arc;

/// Orchestrates every workflow action against the backend.
///
/// Each mutating call follows the same discipline: validate the form
/// locally, gate through the permission resolver, dispatch, then refetch
/// the canonical record. Local state is never advanced ahead of the
/// backend, so a failed call has no observable effect.
pub struct WorkflowClient<G> {
    gateway: Arc<G>,
}

impl<G: ResearchGateway> WorkflowClient<G> {
    #[must_use]
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Direct access for read-only calls the client adds nothing to.
    #[must_use]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    fn permit(
        user: &User,
        action: Action,
        proposal: Option<&Proposal>,
    ) -> Result<(), ClientError> {
        if can_perform(user, action, proposal) {
            Ok(())
        } else {
            // Reaching this branch means the presentation layer rendered an
            // action the resolver forbids. Surface it loudly.
            tracing::error!(?action, user = %user.id, "permission check failed before dispatch");
            Err(ClientError::PermissionDenied { action })
        }
    }

    async fn refetch(&self, id: ProposalId) -> Result<Proposal, ClientError> {
        let proposal = self.gateway.fetch_proposal(id).await?;
        tracing::info!(proposal = %id, status = %proposal.status, "refetched canonical state");
        Ok(proposal)
    }

    pub async fn create_proposal(
        &self,
        user: &User,
        draft: &ProposalDraft,
    ) -> Result<Proposal, ClientError> {
        draft.validate().map_err(ClientError::Validation)?;
        Self::permit(user, Action::CreateProposal, None)?;
        let created = self.gateway.create_proposal(draft).await?;
        self.refetch(created.id).await
    }

    pub async fn update_proposal(
        &self,
        user: &User,
        proposal: &Proposal,
        draft: &ProposalDraft,
    ) -> Result<Proposal, ClientError> {
        draft.validate().map_err(ClientError::Validation)?;
        Self::permit(user, Action::EditProposal, Some(proposal))?;
        self.gateway.update_proposal(proposal.id, draft).await?;
        self.refetch(proposal.id).await
    }

    pub async fn delete_proposal(
        &self,
        user: &User,
        proposal: &Proposal,
    ) -> Result<(), ClientError> {
        Self::permit(user, Action::DeleteProposal, Some(proposal))?;
        self.gateway.delete_proposal(proposal.id).await?;
        Ok(())
    }

    /// Member answers their invitation.
    pub async fn respond_membership(
        &self,
        user: &User,
        proposal: &Proposal,
        accept: bool,
    ) -> Result<Proposal, ClientError> {
        Self::permit(user, Action::RespondMembership, Some(proposal))?;
        self.gateway
            .respond_membership(proposal.id, user.id, accept)
            .await?;
        self.refetch(proposal.id).await
    }

    /// Faculty head assigns the reviewer panel. The selection is validated
    /// in full before anything is sent.
    pub async fn assign_reviewers(
        &self,
        user: &User,
        proposal: &Proposal,
        selected: &[User],
    ) -> Result<Proposal, ClientError> {
        Self::permit(user, Action::AssignReviewers, Some(proposal))?;
        validate_assignment(proposal, selected)?;
        let ids: Vec<_> = selected.iter().map(|u| u.id).collect();
        self.gateway.assign_reviewers(proposal.id, &ids).await?;
        self.refetch(proposal.id).await
    }

    /// Reviewer answers their assignment.
    pub async fn respond_review(
        &self,
        user: &User,
        proposal: &Proposal,
        accept: bool,
    ) -> Result<Proposal, ClientError> {
        Self::permit(user, Action::RespondReview, Some(proposal))?;
        self.gateway
            .respond_review(proposal.id, user.id, accept)
            .await?;
        self.refetch(proposal.id).await
    }

    /// Submits the reviewer's scored rubric and cross-checks the backend's
    /// weighted total against the local computation.
    pub async fn submit_evaluation(
        &self,
        user: &User,
        proposal: &Proposal,
        scores: &ScoreSheet,
        comment: Option<&str>,
    ) -> Result<Proposal, ClientError> {
        scores
            .validate()
            .map_err(|e| ClientError::Evaluation(EvaluationError::InvalidScores(e)))?;
        if proposal
            .reviewer(user.id)
            .is_some_and(|r| r.is_evaluated)
        {
            return Err(ClientError::Evaluation(EvaluationError::AlreadyEvaluated(
                user.id,
            )));
        }
        Self::permit(user, Action::SubmitEvaluation, Some(proposal))?;
        let backend_total = self
            .gateway
            .submit_evaluation(proposal.id, user.id, scores, comment)
            .await?;
        verify_backend_total(scores, backend_total).map_err(ClientError::Evaluation)?;
        self.refetch(proposal.id).await
    }

    pub async fn approve_as_faculty_head(
        &self,
        user: &User,
        proposal: &Proposal,
    ) -> Result<Proposal, ClientError> {
        Self::permit(user, Action::ApproveAsFacultyHead, Some(proposal))?;
        self.gateway.approve_as_faculty_head(proposal.id).await?;
        self.refetch(proposal.id).await
    }

    pub async fn approve_as_dean(
        &self,
        user: &User,
        proposal: &Proposal,
    ) -> Result<Proposal, ClientError> {
        Self::permit(user, Action::ApproveAsDean, Some(proposal))?;
        self.gateway.approve_as_dean(proposal.id).await?;
        self.refetch(proposal.id).await
    }

    pub async fn approve_as_lppm(
        &self,
        user: &User,
        proposal: &Proposal,
    ) -> Result<Proposal, ClientError> {
        Self::permit(user, Action::ApproveAsLppm, Some(proposal))?;
        self.gateway.approve_as_lppm(proposal.id).await?;
        self.refetch(proposal.id).await
    }

    /// Chief researcher uploads the yearly progress report.
    pub async fn submit_progress_report(
        &self,
        user: &User,
        proposal: &Proposal,
        draft: &ProgressReportDraft,
    ) -> Result<Proposal, ClientError> {
        draft.validate().map_err(ClientError::Validation)?;
        Self::permit(user, Action::SubmitProgressReport, Some(proposal))?;
        self.gateway
            .submit_progress_report(proposal.id, draft)
            .await?;
        self.refetch(proposal.id).await
    }

    /// One approval step on the monitoring chain, dispatched by role.
    pub async fn approve_progress(
        &self,
        user: &User,
        proposal: &Proposal,
        approver: Role,
    ) -> Result<Proposal, ClientError> {
        let action = match approver {
            Role::KetuaPenelitianFakultas => Action::ApproveProgressAsFacultyHead,
            Role::Dekan => Action::ApproveProgressAsDean,
            Role::KetuaLppm => Action::ApproveProgressAsLppm,
            other => {
                tracing::error!(role = %other, "role cannot approve progress reports");
                return Err(ClientError::PermissionDenied {
                    action: Action::ApproveProgressAsFacultyHead,
                });
            }
        };
        Self::permit(user, action, Some(proposal))?;
        self.gateway.approve_progress(proposal.id, approver).await?;
        self.refetch(proposal.id).await
    }

    /// LPPM head uploads the monitoring decree, closing the chain.
    pub async fn upload_monitoring_decree(
        &self,
        user: &User,
        proposal: &Proposal,
        file_url: &str,
    ) -> Result<Proposal, ClientError> {
        Self::permit(user, Action::UploadMonitoringDecree, Some(proposal))?;
        self.gateway
            .upload_monitoring_decree(proposal.id, file_url)
            .await?;
        self.refetch(proposal.id).await
    }

    /// Marks one notification read, confirmed by the backend first.
    pub async fn mark_notification_read(
        &self,
        notification: &Notification,
    ) -> Result<(), ClientError> {
        self.gateway.mark_notification_read(notification.id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;
    use crate::gateway::MockResearchGateway;
    use chrono::NaiveDate;
    use simlit_model::{ProposalStatus, UserId, UserType};

    fn dean() -> User {
        User::new(
            UserId(9),
            "dekan",
            "dekan@kampus.ac.id",
            UserType::DosenStaff,
            [Role::Dekan],
        )
    }

    fn proposal(status: ProposalStatus) -> Proposal {
        Proposal {
            id: ProposalId(4),
            title: "Telaah Kurikulum".into(),
            chief_researcher: User::new(
                UserId(1),
                "chief",
                "chief@kampus.ac.id",
                UserType::DosenStaff,
                [Role::Dosen],
            ),
            execution_period: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            funding_source: "Internal".into(),
            requested_amount: 1_000_000.0,
            research_outcome: "Laporan".into(),
            partner_name: None,
            partner_address: None,
            partner_pic: None,
            document_url: None,
            status,
            members: Vec::new(),
            reviewers: Vec::new(),
            evaluations: Vec::new(),
            report_flow: None,
        }
    }

    #[tokio::test]
    async fn permission_violation_never_reaches_the_gateway() {
        // No expectations set: any gateway call would panic the test.
        let gateway = Arc::new(MockResearchGateway::new());
        let client = WorkflowClient::new(gateway);
        let err = client
            .approve_as_dean(&dean(), &proposal(ProposalStatus::ReviewCompleted))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ClientError::PermissionDenied {
                action: Action::ApproveAsDean
            }
        );
    }

    #[tokio::test]
    async fn transport_failure_is_retryable_and_mutates_nothing() {
        let mut gateway = MockResearchGateway::new();
        gateway
            .expect_approve_as_dean()
            .times(1)
            .returning(|_| Err(GatewayError::Transport("connection reset".into())));
        let client = WorkflowClient::new(Arc::new(gateway));
        let err = client
            .approve_as_dean(&dean(), &proposal(ProposalStatus::WaitingDeanApproval))
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn invalid_draft_is_rejected_before_dispatch() {
        let gateway = Arc::new(MockResearchGateway::new());
        let client = WorkflowClient::new(gateway);
        let chief = User::new(
            UserId(1),
            "chief",
            "chief@kampus.ac.id",
            UserType::DosenStaff,
            [Role::Dosen],
        );
        let err = client
            .create_proposal(&chief, &ProposalDraft::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[tokio::test]
    async fn chief_in_reviewer_selection_is_rejected_before_dispatch() {
        let gateway = Arc::new(MockResearchGateway::new());
        let client = WorkflowClient::new(gateway);
        let head = User::new(
            UserId(8),
            "kpf",
            "kpf@kampus.ac.id",
            UserType::DosenStaff,
            [Role::KetuaPenelitianFakultas],
        );
        let p = proposal(ProposalStatus::WaitingFacultyHead);
        let chief_as_reviewer = User::new(
            UserId(1),
            "chief",
            "chief@kampus.ac.id",
            UserType::DosenStaff,
            [Role::Dosen, Role::Reviewer],
        );
        let err = client
            .assign_reviewers(&head, &p, &[chief_as_reviewer])
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Assignment(_)));
    }
}
