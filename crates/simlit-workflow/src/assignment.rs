use simlit_model::{Proposal, Role, User, UserId, MAX_REVIEWERS};

/// Rejections of a reviewer-assignment request, raised before any call
/// leaves the client.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssignmentError {
    #[error("at least one reviewer must be selected")]
    Empty,

    #[error("at most {MAX_REVIEWERS} reviewers may be assigned, got {0}")]
    TooMany(usize),

    #[error("user {0} appears more than once in the selection")]
    Duplicate(UserId),

    #[error("user {0} does not hold the REVIEWER role")]
    NotAReviewer(UserId),

    /// The chief researcher and lecturer members may not review their own
    /// proposal.
    #[error("user {0} is on the proposal's research team")]
    OnResearchTeam(UserId),
}

/// Validates a reviewer selection for one proposal.
///
/// Checks the full selection and reports the first violation in selection
/// order: size bounds, duplicates, role membership, then the conflict of
/// interest against the research team.
pub fn validate_assignment(proposal: &Proposal, selected: &[User]) -> Result<(), AssignmentError> {
    if selected.is_empty() {
        return Err(AssignmentError::Empty);
    }
    if selected.len() > MAX_REVIEWERS {
        return Err(AssignmentError::TooMany(selected.len()));
    }
    for (i, candidate) in selected.iter().enumerate() {
        if selected[..i].iter().any(|prev| prev.id == candidate.id) {
            return Err(AssignmentError::Duplicate(candidate.id));
        }
    }
    let team = proposal.dosen_team_ids();
    for candidate in selected {
        if !candidate.has_role(Role::Reviewer) {
            return Err(AssignmentError::NotAReviewer(candidate.id));
        }
        if team.contains(&candidate.id) {
            return Err(AssignmentError::OnResearchTeam(candidate.id));
        }
    }
    Ok(())
}
