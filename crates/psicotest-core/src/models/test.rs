use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::question::{NewQuestion, Question};
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum Category {
    Depression,
    Anxiety,
    SocialAnxiety,
    Adhd,
    Stress,
    Ocd,
    Burnout,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Depression => "DEPRESSION",
            Category::Anxiety => "ANXIETY",
            Category::SocialAnxiety => "SOCIAL_ANXIETY",
            Category::Adhd => "ADHD",
            Category::Stress => "STRESS",
            Category::Ocd => "OCD",
            Category::Burnout => "BURNOUT",
            Category::Other => "OTHER",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEPRESSION" => Ok(Category::Depression),
            "ANXIETY" => Ok(Category::Anxiety),
            "SOCIAL_ANXIETY" => Ok(Category::SocialAnxiety),
            "ADHD" => Ok(Category::Adhd),
            "STRESS" => Ok(Category::Stress),
            "OCD" => Ok(Category::Ocd),
            "BURNOUT" => Ok(Category::Burnout),
            "OTHER" => Ok(Category::Other),
            other => Err(CoreError::UnknownVariant {
                kind: "category",
                value: other.to_string(),
            }),
        }
    }
}

/// A questionnaire definition.
///
/// Tests that already have results are never edited in place; an edit
/// produces a new row with the same `slug` and `version + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Test {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub instructions: String,
    pub time_limit_minutes: Option<u32>,
    pub is_active: bool,
    pub version: u32,
    pub created_at: jiff::Timestamp,
}

/// A test together with its ordered questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TestWithQuestions {
    #[serde(flatten)]
    pub test: Test,
    pub questions: Vec<Question>,
}

/// Administrator input for creating or revising a test.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewTest {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub time_limit_minutes: Option<u32>,
    pub questions: Vec<NewQuestion>,
}

impl NewTest {
    /// Check the fields an administrator must supply.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.slug.trim().is_empty() {
            return Err(CoreError::MissingField("slug".to_string()));
        }
        if self.title.trim().is_empty() {
            return Err(CoreError::MissingField("title".to_string()));
        }
        if self.questions.is_empty() {
            return Err(CoreError::MissingField("questions".to_string()));
        }
        for q in &self.questions {
            if q.text.trim().is_empty() {
                return Err(CoreError::MissingField("question text".to_string()));
            }
            q.options.validate()?;
        }
        Ok(())
    }
}
