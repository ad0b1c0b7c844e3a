use crate::validation::FieldError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Progress-report approval statuses, in chain order.
///
/// Wire names stay exactly as the backend emits them. The chain is strictly
/// sequential: one approver role per step, one predecessor per status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReportStatus {
    #[serde(rename = "LAPORAN_DIUPLOAD_KETUA_PENELITI")]
    LaporanDiuploadKetuaPeneliti,
    #[serde(rename = "DISETUJUI_KETUA_PENELITIAN_FAKULTAS")]
    DisetujuiKetuaPenelitianFakultas,
    #[serde(rename = "DISETUJUI_DEKAN")]
    DisetujuiDekan,
    #[serde(rename = "DISETUJUI_KETUA_LPPM")]
    DisetujuiKetuaLppm,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReportStatus::LaporanDiuploadKetuaPeneliti => "LAPORAN_DIUPLOAD_KETUA_PENELITI",
            ReportStatus::DisetujuiKetuaPenelitianFakultas => {
                "DISETUJUI_KETUA_PENELITIAN_FAKULTAS"
            }
            ReportStatus::DisetujuiDekan => "DISETUJUI_DEKAN",
            ReportStatus::DisetujuiKetuaLppm => "DISETUJUI_KETUA_LPPM",
        };
        f.write_str(s)
    }
}

/// Monitoring state attached to a proposal once execution starts.
///
/// `status` is null until the chief researcher uploads the first report.
/// The flow is terminal once the monitoring decree document is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportApprovalFlow {
    #[serde(default)]
    pub status: Option<ReportStatus>,
    #[serde(rename = "tahunPelaksanaan", default, skip_serializing_if = "Option::is_none")]
    pub report_year: Option<NaiveDate>,
    #[serde(rename = "biayaTahunBerjalan", default, skip_serializing_if = "Option::is_none")]
    pub current_year_budget: Option<f64>,
    #[serde(rename = "biayaKeseluruhan", default, skip_serializing_if = "Option::is_none")]
    pub cumulative_budget: Option<f64>,
    #[serde(rename = "fileUrl", default, skip_serializing_if = "Option::is_none")]
    pub report_url: Option<String>,
    #[serde(rename = "skPemantauanUrl", default, skip_serializing_if = "Option::is_none")]
    pub monitoring_decree_url: Option<String>,
}

impl ReportApprovalFlow {
    /// An empty flow, as attached when a proposal enters execution.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            status: None,
            report_year: None,
            current_year_budget: None,
            cumulative_budget: None,
            report_url: None,
            monitoring_decree_url: None,
        }
    }

    /// Terminal once LPPM has approved and uploaded the monitoring decree.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.status == Some(ReportStatus::DisetujuiKetuaLppm)
            && self.monitoring_decree_url.is_some()
    }
}

/// Form payload for the chief researcher's progress report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProgressReportDraft {
    #[serde(rename = "tahunPelaksanaan")]
    pub report_year: Option<NaiveDate>,
    #[serde(rename = "biayaTahunBerjalan")]
    pub current_year_budget: Option<f64>,
    #[serde(rename = "biayaKeseluruhan")]
    pub cumulative_budget: Option<f64>,
    #[serde(rename = "fileUrl")]
    pub report_file: Option<String>,
}

impl ProgressReportDraft {
    /// Field-by-field validation. Budgets must be present and non-negative.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.report_year.is_none() {
            errors.push(FieldError::new("tahunPelaksanaan", "report year is required"));
        }
        match self.current_year_budget {
            None => errors.push(FieldError::new(
                "biayaTahunBerjalan",
                "current-year budget is required",
            )),
            Some(b) if b < 0.0 => errors.push(FieldError::new(
                "biayaTahunBerjalan",
                "current-year budget must not be negative",
            )),
            Some(_) => {}
        }
        match self.cumulative_budget {
            None => errors.push(FieldError::new(
                "biayaKeseluruhan",
                "cumulative budget is required",
            )),
            Some(b) if b < 0.0 => errors.push(FieldError::new(
                "biayaKeseluruhan",
                "cumulative budget must not be negative",
            )),
            Some(_) => {}
        }
        if self.report_file.is_none() {
            errors.push(FieldError::new("fileUrl", "report file is required"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
