//! psicotest-instruments
//!
//! Questionnaire definitions and scoring. Pure data and pure functions
//! with no database or network dependency: the built-in instruments with
//! their bands, the scoring function and the rule-based interpreter.

pub mod error;
pub mod instruments;
pub mod interpret;
pub mod scoring;

use psicotest_core::models::answer::Answer;
use psicotest_core::models::question::Question;
use psicotest_core::models::test::{Category, Test, TestWithQuestions};

use error::InstrumentError;
use scoring::SeverityBand;

/// Trait implemented by each built-in questionnaire.
pub trait Instrument: Send + Sync {
    /// Stable identifier, also used as the test id (e.g. "phq9").
    fn id(&self) -> &str;

    /// URL slug (e.g. "phq-9").
    fn slug(&self) -> &str;

    /// Short name (e.g. "PHQ-9").
    fn name(&self) -> &str;

    fn title(&self) -> &str;

    fn description(&self) -> &str;

    fn category(&self) -> Category;

    fn instructions(&self) -> &str;

    /// Questions in presentation order.
    fn questions(&self) -> &[Question];

    /// Severity bands in ascending order, partitioning `[0, max_score]`.
    fn bands(&self) -> &[SeverityBand];

    fn max_score(&self) -> u32 {
        scoring::max_score(self.questions())
    }

    fn interpret(&self, score: u32) -> Result<&SeverityBand, InstrumentError> {
        scoring::classify(score, self.bands())
    }

    /// Item-level warnings that must be shown regardless of the total,
    /// e.g. any endorsement of self-harm. Items are matched by their order
    /// within `questions`, so stored copies with other ids still qualify.
    fn safety_notes(&self, _questions: &[Question], _answers: &[Answer]) -> Vec<String> {
        Vec::new()
    }

    fn to_test(&self) -> Test {
        Test {
            id: self.id().to_string(),
            slug: self.slug().to_string(),
            title: self.title().to_string(),
            description: self.description().to_string(),
            category: self.category(),
            instructions: self.instructions().to_string(),
            time_limit_minutes: None,
            is_active: true,
            version: 1,
            created_at: jiff::Timestamp::UNIX_EPOCH,
        }
    }

    fn to_test_with_questions(&self) -> TestWithQuestions {
        TestWithQuestions {
            test: self.to_test(),
            questions: self.questions().to_vec(),
        }
    }
}

/// Return all built-in instruments.
pub fn all_instruments() -> Vec<Box<dyn Instrument>> {
    vec![
        Box::new(instruments::phq9::Phq9),
        Box::new(instruments::gad7::Gad7),
        Box::new(instruments::spin::Spin),
        Box::new(instruments::pss10::Pss10),
    ]
}

/// Look up an instrument by id or slug.
pub fn get_instrument(key: &str) -> Option<Box<dyn Instrument>> {
    all_instruments()
        .into_iter()
        .find(|i| i.id() == key || i.slug() == key)
}
