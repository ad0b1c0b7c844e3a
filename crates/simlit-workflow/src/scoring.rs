use crate::error::EvaluationError;
use simlit_model::{ProposalEvaluation, ScoreSheet};

/// The eight rubric criteria, in form order.
///
/// Weights are percentages and sum to 100, so a sheet of straight 100s
/// totals exactly 100.00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    QualityAndNovelty,
    RoadmapFit,
    LiteratureReview,
    SourceCurrency,
    MethodologyFit,
    OutcomeTarget,
    TeamCompetency,
    WritingCompliance,
}

impl Criterion {
    /// All criteria in rubric order. Matches `ScoreSheet::as_array`.
    pub const ALL: [Criterion; 8] = [
        Criterion::QualityAndNovelty,
        Criterion::RoadmapFit,
        Criterion::LiteratureReview,
        Criterion::SourceCurrency,
        Criterion::MethodologyFit,
        Criterion::OutcomeTarget,
        Criterion::TeamCompetency,
        Criterion::WritingCompliance,
    ];

    /// Weight of the criterion, in percent.
    #[must_use]
    pub fn weight(&self) -> f64 {
        match self {
            Criterion::QualityAndNovelty => 25.0,
            Criterion::RoadmapFit => 15.0,
            Criterion::LiteratureReview => 10.0,
            Criterion::SourceCurrency => 5.0,
            Criterion::MethodologyFit => 20.0,
            Criterion::OutcomeTarget => 10.0,
            Criterion::TeamCompetency => 10.0,
            Criterion::WritingCompliance => 5.0,
        }
    }

    /// Rubric label as printed on the evaluation form.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Criterion::QualityAndNovelty => {
                "Kualitas dan relevansi masalah penelitian, tujuan, dan kebaruan"
            }
            Criterion::RoadmapFit => "Kesesuaian dengan Roadmap Penelitian Fakultas",
            Criterion::LiteratureReview => "Relevansi Tinjauan Pustaka",
            Criterion::SourceCurrency => "Kemutakhiran dan sumber primer tinjauan pustaka",
            Criterion::MethodologyFit => "Kesesuaian metodologi dengan masalah penelitian",
            Criterion::OutcomeTarget => "Kewajaran target capaian luaran",
            Criterion::TeamCompetency => {
                "Kesesuaian kompetensi tim peneliti dan pembagian tugas"
            }
            Criterion::WritingCompliance => "Kesesuaian penulisan proposal dengan panduan",
        }
    }
}

/// Rounds to two decimals, half away from zero. Scores are non-negative, so
/// this matches the half-up display rounding the backend applies.
#[inline]
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Contribution of one raw score under a percentage weight.
#[inline]
#[must_use]
pub fn weighted_score(raw: f64, weight: f64) -> f64 {
    raw * weight / 100.0
}

/// Weighted total of a sheet, rounded to two decimals.
#[must_use]
pub fn total_score(sheet: &ScoreSheet) -> f64 {
    let total = Criterion::ALL
        .iter()
        .zip(sheet.as_array())
        .map(|(criterion, raw)| weighted_score(raw, criterion.weight()))
        .sum();
    round2(total)
}

/// Checks the locally computed total against the backend's `totalNilai`.
///
/// Both sides round to two decimals, so agreement is exact equality of the
/// rounded values.
pub fn verify_backend_total(sheet: &ScoreSheet, backend_total: f64) -> Result<(), EvaluationError> {
    let computed = total_score(sheet);
    if (computed - round2(backend_total)).abs() < f64::EPSILON {
        Ok(())
    } else {
        Err(EvaluationError::TotalMismatch {
            computed,
            backend: backend_total,
        })
    }
}

/// Arithmetic mean of the evaluations' totals, to two decimals.
///
/// `None` when no evaluation exists; the average is undefined then and the
/// caller must not render a number.
#[must_use]
pub fn average_total(evaluations: &[ProposalEvaluation]) -> Option<f64> {
    if evaluations.is_empty() {
        return None;
    }
    let sum: f64 = evaluations.iter().map(|e| e.total).sum();
    Some(round2(sum / evaluations.len() as f64))
}
