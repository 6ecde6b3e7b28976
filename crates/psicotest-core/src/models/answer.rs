use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A single response collected while a user takes a test.
///
/// `value` is the score of the option the user picked. Answers only reach
/// storage as part of a [`TestResult`](super::result::TestResult).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Answer {
    pub question_id: String,
    pub value: i64,
}
