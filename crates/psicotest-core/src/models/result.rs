use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::answer::Answer;
use super::severity::Severity;

/// A completed attempt at a test. Written once, never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TestResult {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub test_id: String,
    pub total_score: u32,
    pub max_score: u32,
    pub percentage: u32,
    /// Severity band label, e.g. "Moderado".
    pub category: String,
    pub severity: Severity,
    pub interpretation: String,
    pub recommendations: Vec<String>,
    pub completed_at: jiff::Timestamp,
    pub answers: Vec<Answer>,
}

/// A scored attempt ready to be persisted. Storage assigns `id` and
/// `completed_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTestResult {
    pub user_id: Option<Uuid>,
    pub test_id: String,
    pub total_score: u32,
    pub max_score: u32,
    pub percentage: u32,
    pub category: String,
    pub severity: Severity,
    pub interpretation: String,
    pub recommendations: Vec<String>,
    pub answers: Vec<Answer>,
}

impl NewTestResult {
    pub fn into_result(self, id: Uuid, completed_at: jiff::Timestamp) -> TestResult {
        TestResult {
            id,
            user_id: self.user_id,
            test_id: self.test_id,
            total_score: self.total_score,
            max_score: self.max_score,
            percentage: self.percentage,
            category: self.category,
            severity: self.severity,
            interpretation: self.interpretation,
            recommendations: self.recommendations,
            completed_at,
            answers: self.answers,
        }
    }
}
