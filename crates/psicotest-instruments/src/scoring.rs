use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use psicotest_core::models::answer::Answer;
use psicotest_core::models::question::Question;
use psicotest_core::models::severity::Severity;

use crate::error::InstrumentError;

/// A contiguous, inclusive range of total scores and what it means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SeverityBand {
    pub min: u32,
    pub max: u32,
    pub label: String,
    pub severity: Severity,
    pub guidance: String,
    pub recommendations: Vec<String>,
}

impl SeverityBand {
    pub fn contains(&self, score: u32) -> bool {
        self.min <= score && score <= self.max
    }
}

/// Score totals for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Evaluation {
    pub total_score: u32,
    pub max_score: u32,
    pub percentage: u32,
}

/// Sum the scores of the chosen options.
///
/// Answers are keyed by question id; a later answer for the same question
/// replaces an earlier one. Answers for unknown questions, and values that
/// match no option of their question, contribute nothing. The sum
/// saturates at `u32::MAX`.
pub fn score_answers(questions: &[Question], answers: &[Answer]) -> u32 {
    let chosen: HashMap<&str, i64> = answers
        .iter()
        .map(|a| (a.question_id.as_str(), a.value))
        .collect();

    questions
        .iter()
        .filter_map(|q| {
            chosen
                .get(q.id.as_str())
                .and_then(|value| q.options.score_for(*value))
        })
        .fold(0, u32::saturating_add)
}

/// Highest reachable total: the best option of every question.
pub fn max_score(questions: &[Question]) -> u32 {
    questions
        .iter()
        .map(|q| q.options.max_score())
        .fold(0, u32::saturating_add)
}

/// `round(100 * score / max_score)`, rounding halves up. Zero when the
/// maximum is zero.
pub fn percentage(score: u32, max_score: u32) -> u32 {
    if max_score == 0 {
        return 0;
    }
    let score = u64::from(score);
    let max = u64::from(max_score);
    ((200 * score + max) / (2 * max)) as u32
}

pub fn evaluate(questions: &[Question], answers: &[Answer]) -> Evaluation {
    let total_score = score_answers(questions, answers);
    let max_score = max_score(questions);
    Evaluation {
        total_score,
        max_score,
        percentage: percentage(total_score, max_score),
    }
}

/// Find the band containing `score`.
pub fn classify(score: u32, bands: &[SeverityBand]) -> Result<&SeverityBand, InstrumentError> {
    bands
        .iter()
        .find(|b| b.contains(score))
        .ok_or_else(|| InstrumentError::UnclassifiedScore {
            score,
            max_score: bands.iter().map(|b| b.max).max().unwrap_or(0),
        })
}

/// Check that `bands` partition `[0, max_score]` with no gaps or overlaps,
/// in ascending order.
pub fn validate_bands(bands: &[SeverityBand], max_score: u32) -> Result<(), InstrumentError> {
    let Some(first) = bands.first() else {
        return Err(InstrumentError::InvalidBands("no bands defined".to_string()));
    };
    if first.min != 0 {
        return Err(InstrumentError::InvalidBands(format!(
            "first band starts at {}, expected 0",
            first.min
        )));
    }

    let mut expected_min = 0;
    for band in bands {
        if band.min > band.max {
            return Err(InstrumentError::InvalidBands(format!(
                "band '{}' has min {} above max {}",
                band.label, band.min, band.max
            )));
        }
        if band.min != expected_min {
            return Err(InstrumentError::InvalidBands(format!(
                "band '{}' starts at {}, expected {}",
                band.label, band.min, expected_min
            )));
        }
        expected_min = band.max + 1;
    }

    let last_max = expected_min - 1;
    if last_max != max_score {
        return Err(InstrumentError::InvalidBands(format!(
            "bands end at {last_max}, expected {max_score}"
        )));
    }
    Ok(())
}
