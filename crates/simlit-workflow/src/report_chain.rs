use crate::error::TransitionError;
use simlit_model::{ReportStatus, Role};

/// Events on the monitoring chain attached to an ongoing proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportEvent {
    /// Chief researcher uploaded the progress report.
    ReportUploaded,
    /// Faculty head approved the report.
    FacultyHeadApproved,
    /// Dean approved the report.
    DeanApproved,
    /// LPPM head approved the report.
    LppmApproved,
    /// LPPM head uploaded the monitoring decree, closing the chain.
    MonitoringDecreeUploaded,
}

/// Advances the chain by one step from the current status.
///
/// The chain is strictly sequential with a single predecessor per status;
/// `None` is the pre-submission state. Advancing past the last approval is
/// an error: the decree upload finishes the flow without a status change.
pub fn advance_report(current: Option<ReportStatus>) -> Result<ReportStatus, TransitionError> {
    match current {
        None => Ok(ReportStatus::LaporanDiuploadKetuaPeneliti),
        Some(ReportStatus::LaporanDiuploadKetuaPeneliti) => {
            Ok(ReportStatus::DisetujuiKetuaPenelitianFakultas)
        }
        Some(ReportStatus::DisetujuiKetuaPenelitianFakultas) => Ok(ReportStatus::DisetujuiDekan),
        Some(ReportStatus::DisetujuiDekan) => Ok(ReportStatus::DisetujuiKetuaLppm),
        Some(ReportStatus::DisetujuiKetuaLppm) => {
            Err(TransitionError::ReportChainComplete(current))
        }
    }
}

/// The one role allowed to move the chain into the given status.
///
/// The initial upload is gated by ownership (chief researcher), not by a
/// named role, so it has no entry here.
#[must_use]
pub fn report_approver(next: ReportStatus) -> Option<Role> {
    match next {
        ReportStatus::LaporanDiuploadKetuaPeneliti => None,
        ReportStatus::DisetujuiKetuaPenelitianFakultas => Some(Role::KetuaPenelitianFakultas),
        ReportStatus::DisetujuiDekan => Some(Role::Dekan),
        ReportStatus::DisetujuiKetuaLppm => Some(Role::KetuaLppm),
    }
}
