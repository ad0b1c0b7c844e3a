use crate::error::GatewayError;
use async_trait::async_trait;
use simlit_model::{
    Notification, NotificationId, ProgressReportDraft, Proposal, ProposalDraft, ProposalId, Role,
    ScoreSheet, User, UserId,
};

/// The backend boundary of the workflow model.
///
/// One method per conceptual REST operation. Implementations perform the
/// actual transport; route shapes and HTTP concerns stay behind this trait.
/// Every mutating call is fire-and-confirm: the caller refetches canonical
/// state after success and never applies the mutation locally.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResearchGateway: Send + Sync {
    /// All proposals visible to the caller. Server-side filtering is the
    /// security boundary; any client-side filtering is display convenience.
    async fn fetch_proposals(&self) -> Result<Vec<Proposal>, GatewayError>;

    async fn fetch_proposal(&self, id: ProposalId) -> Result<Proposal, GatewayError>;

    async fn create_proposal(&self, draft: &ProposalDraft) -> Result<Proposal, GatewayError>;

    async fn update_proposal(
        &self,
        id: ProposalId,
        draft: &ProposalDraft,
    ) -> Result<Proposal, GatewayError>;

    async fn delete_proposal(&self, id: ProposalId) -> Result<(), GatewayError>;

    /// Member accepts or rejects their invitation.
    async fn respond_membership(
        &self,
        id: ProposalId,
        user_id: UserId,
        accept: bool,
    ) -> Result<(), GatewayError>;

    async fn assign_reviewers(
        &self,
        id: ProposalId,
        reviewer_ids: &[UserId],
    ) -> Result<(), GatewayError>;

    /// Reviewer accepts or rejects their assignment.
    async fn respond_review(
        &self,
        id: ProposalId,
        reviewer_id: UserId,
        accept: bool,
    ) -> Result<(), GatewayError>;

    /// Submits a scored rubric. Returns the backend-computed weighted total.
    async fn submit_evaluation(
        &self,
        id: ProposalId,
        reviewer_id: UserId,
        scores: &ScoreSheet,
        comment: Option<&str>,
    ) -> Result<f64, GatewayError>;

    async fn approve_as_faculty_head(&self, id: ProposalId) -> Result<(), GatewayError>;

    async fn approve_as_dean(&self, id: ProposalId) -> Result<(), GatewayError>;

    async fn approve_as_lppm(&self, id: ProposalId) -> Result<(), GatewayError>;

    async fn submit_progress_report(
        &self,
        id: ProposalId,
        draft: &ProgressReportDraft,
    ) -> Result<(), GatewayError>;

    /// One approval step on the monitoring chain, by the given role.
    async fn approve_progress(&self, id: ProposalId, approver: Role) -> Result<(), GatewayError>;

    async fn upload_monitoring_decree(
        &self,
        id: ProposalId,
        file_url: &str,
    ) -> Result<(), GatewayError>;

    /// Reviewer candidates and other directory lookups.
    async fn fetch_users(&self) -> Result<Vec<User>, GatewayError>;

    async fn fetch_notifications(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Notification>, GatewayError>;

    async fn mark_notification_read(&self, id: NotificationId) -> Result<(), GatewayError>;
}
