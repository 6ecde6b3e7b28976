use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Likert items must offer this many levels.
pub const LIKERT_LEVELS: [usize; 2] = [4, 5];

/// Highest score a single option may carry.
pub const MAX_OPTION_SCORE: u32 = 1000;

/// One selectable response and the score it contributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Choice {
    pub label: String,
    pub score: u32,
}

impl Choice {
    pub fn new(label: impl Into<String>, score: u32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// The response set of a question, tagged by question type.
///
/// Stored as a JSON column; [`Options::from_json`] is the only way stored
/// text becomes an `Options`, so every loaded value has been validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum Options {
    #[serde(rename = "LIKERT_SCALE")]
    Likert { levels: Vec<Choice> },
    MultipleChoice { choices: Vec<Choice> },
    YesNo { yes: Choice, no: Choice },
}

impl Options {
    /// Build a Likert option set, checking the level count.
    pub fn likert(levels: Vec<Choice>) -> Result<Self, CoreError> {
        let options = Options::Likert { levels };
        options.validate()?;
        Ok(options)
    }

    pub fn multiple_choice(choices: Vec<Choice>) -> Result<Self, CoreError> {
        let options = Options::MultipleChoice { choices };
        options.validate()?;
        Ok(options)
    }

    pub fn yes_no(yes_score: u32, no_score: u32) -> Self {
        Options::YesNo {
            yes: Choice::new("Sí", yes_score),
            no: Choice::new("No", no_score),
        }
    }

    /// Parse and validate a serialized option set.
    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        let options: Options = serde_json::from_str(raw)?;
        options.validate()?;
        Ok(options)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            Options::Likert { levels } => {
                if !LIKERT_LEVELS.contains(&levels.len()) {
                    return Err(CoreError::InvalidOptions(format!(
                        "likert scale needs 4 or 5 levels, got {}",
                        levels.len()
                    )));
                }
            }
            Options::MultipleChoice { choices } => {
                if choices.len() < 2 {
                    return Err(CoreError::InvalidOptions(format!(
                        "multiple choice needs at least 2 choices, got {}",
                        choices.len()
                    )));
                }
            }
            Options::YesNo { .. } => {}
        }

        let choices = self.choices();
        for (i, a) in choices.iter().enumerate() {
            if a.label.trim().is_empty() {
                return Err(CoreError::InvalidOptions("empty option label".to_string()));
            }
            if a.score > MAX_OPTION_SCORE {
                return Err(CoreError::InvalidOptions(format!(
                    "option score {} exceeds {MAX_OPTION_SCORE}",
                    a.score
                )));
            }
            if choices[i + 1..].iter().any(|b| b.score == a.score) {
                return Err(CoreError::InvalidOptions(format!(
                    "duplicate option score {}",
                    a.score
                )));
            }
        }
        Ok(())
    }

    pub fn question_type(&self) -> QuestionType {
        match self {
            Options::Likert { .. } => QuestionType::LikertScale,
            Options::MultipleChoice { .. } => QuestionType::MultipleChoice,
            Options::YesNo { .. } => QuestionType::YesNo,
        }
    }

    /// All choices in presentation order.
    pub fn choices(&self) -> Vec<&Choice> {
        match self {
            Options::Likert { levels } => levels.iter().collect(),
            Options::MultipleChoice { choices } => choices.iter().collect(),
            Options::YesNo { yes, no } => vec![yes, no],
        }
    }

    /// Score of the choice whose score equals `value`, if one exists.
    pub fn score_for(&self, value: i64) -> Option<u32> {
        self.choices()
            .into_iter()
            .find(|c| i64::from(c.score) == value)
            .map(|c| c.score)
    }

    pub fn max_score(&self) -> u32 {
        self.choices().iter().map(|c| c.score).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum QuestionType {
    LikertScale,
    MultipleChoice,
    YesNo,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::LikertScale => "LIKERT_SCALE",
            QuestionType::MultipleChoice => "MULTIPLE_CHOICE",
            QuestionType::YesNo => "YES_NO",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LIKERT_SCALE" => Ok(QuestionType::LikertScale),
            "MULTIPLE_CHOICE" => Ok(QuestionType::MultipleChoice),
            "YES_NO" => Ok(QuestionType::YesNo),
            other => Err(CoreError::UnknownVariant {
                kind: "question type",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Question {
    pub id: String,
    pub test_id: String,
    pub text: String,
    pub order: u32,
    pub options: Options,
}

impl Question {
    pub fn question_type(&self) -> QuestionType {
        self.options.question_type()
    }
}

/// A question as submitted by an administrator, before ids are assigned.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewQuestion {
    pub text: String,
    pub options: Options,
}
