use crate::ids::{EvaluationId, ProposalId, UserId};
use crate::validation::FieldError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest raw score a criterion accepts.
pub const SCORE_MIN: f64 = 0.0;
/// Highest raw score a criterion accepts.
pub const SCORE_MAX: f64 = 100.0;

/// Raw rubric scores for one review, prior to weighting.
///
/// Field order matches the rubric order used everywhere else; keep
/// [`ScoreSheet::as_array`] in sync when touching it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSheet {
    #[serde(rename = "nilaiKualitasDanKebaruan")]
    pub quality_and_novelty: f64,
    #[serde(rename = "nilaiRoadmap")]
    pub roadmap_fit: f64,
    #[serde(rename = "nilaiTinjauanPustaka")]
    pub literature_review: f64,
    #[serde(rename = "nilaiKemutakhiranSumber")]
    pub source_currency: f64,
    #[serde(rename = "nilaiMetodologi")]
    pub methodology_fit: f64,
    #[serde(rename = "nilaiTargetLuaran")]
    pub outcome_target: f64,
    #[serde(rename = "nilaiKompetensiDanTugas")]
    pub team_competency: f64,
    #[serde(rename = "nilaiPenulisan")]
    pub writing_compliance: f64,
}

impl ScoreSheet {
    /// Uniform sheet, handy for tests and fixtures.
    #[must_use]
    pub fn uniform(score: f64) -> Self {
        Self {
            quality_and_novelty: score,
            roadmap_fit: score,
            literature_review: score,
            source_currency: score,
            methodology_fit: score,
            outcome_target: score,
            team_competency: score,
            writing_compliance: score,
        }
    }

    /// Raw scores in rubric order.
    #[must_use]
    pub fn as_array(&self) -> [f64; 8] {
        [
            self.quality_and_novelty,
            self.roadmap_fit,
            self.literature_review,
            self.source_currency,
            self.methodology_fit,
            self.outcome_target,
            self.team_competency,
            self.writing_compliance,
        ]
    }

    /// Every raw score must fall inside `0..=100`.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        const FIELDS: [&str; 8] = [
            "nilaiKualitasDanKebaruan",
            "nilaiRoadmap",
            "nilaiTinjauanPustaka",
            "nilaiKemutakhiranSumber",
            "nilaiMetodologi",
            "nilaiTargetLuaran",
            "nilaiKompetensiDanTugas",
            "nilaiPenulisan",
        ];
        let mut errors = Vec::new();
        for (field, score) in FIELDS.iter().zip(self.as_array()) {
            if !(SCORE_MIN..=SCORE_MAX).contains(&score) || score.is_nan() {
                errors.push(FieldError::new(field, "score must be between 0 and 100"));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// One reviewer's submitted, immutable evaluation of a proposal.
///
/// `total` is the backend-computed weighted sum; the client recomputes it
/// and treats a mismatch as a contract violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalEvaluation {
    pub id: EvaluationId,
    #[serde(rename = "proposalId")]
    pub proposal_id: ProposalId,
    #[serde(rename = "reviewerId")]
    pub reviewer_id: UserId,
    #[serde(flatten)]
    pub scores: ScoreSheet,
    #[serde(rename = "komentar", default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "totalNilai")]
    pub total: f64,
    #[serde(rename = "tanggalEvaluasi")]
    pub evaluated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_sheet_serializes_rubric_field_names() {
        let sheet = ScoreSheet::uniform(80.0);
        let json = serde_json::to_value(sheet).unwrap();
        assert_eq!(json["nilaiKualitasDanKebaruan"], 80.0);
        assert_eq!(json["nilaiPenulisan"], 80.0);
    }

    #[test]
    fn out_of_range_scores_are_reported_per_field() {
        let mut sheet = ScoreSheet::uniform(50.0);
        sheet.roadmap_fit = 101.0;
        sheet.writing_compliance = -1.0;
        let errors = sheet.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "nilaiRoadmap");
        assert_eq!(errors[1].field, "nilaiPenulisan");
    }

    #[test]
    fn nan_scores_are_rejected() {
        let mut sheet = ScoreSheet::uniform(50.0);
        sheet.methodology_fit = f64::NAN;
        assert!(sheet.validate().is_err());
    }

    #[test]
    fn boundary_scores_are_accepted() {
        assert!(ScoreSheet::uniform(0.0).validate().is_ok());
        assert!(ScoreSheet::uniform(100.0).validate().is_ok());
    }
}
