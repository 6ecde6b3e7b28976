pub mod gad7;
pub mod phq9;
pub mod pss10;
pub mod spin;

use psicotest_core::models::question::{Choice, Options, Question};
use psicotest_core::models::severity::Severity;
use psicotest_core::schema;

use crate::scoring::SeverityBand;

/// Likert options scored 0, 1, 2, ... in label order.
fn likert(labels: &[&str]) -> Options {
    Options::Likert {
        levels: labels
            .iter()
            .enumerate()
            .map(|(i, label)| Choice::new(*label, i as u32))
            .collect(),
    }
}

/// Likert options for reverse-keyed items: the first label scores highest.
fn likert_reversed(labels: &[&str]) -> Options {
    let top = labels.len().saturating_sub(1) as u32;
    Options::Likert {
        levels: labels
            .iter()
            .enumerate()
            .map(|(i, label)| Choice::new(*label, top - i as u32))
            .collect(),
    }
}

/// Number items from 1 and give each the options chosen by `options`.
fn build_questions(test_id: &str, items: &[&str], options: impl Fn(usize) -> Options) -> Vec<Question> {
    items
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let order = i as u32 + 1;
            Question {
                id: schema::question_id(test_id, order),
                test_id: test_id.to_string(),
                text: text.to_string(),
                order,
                options: options(i),
            }
        })
        .collect()
}

fn band(
    min: u32,
    max: u32,
    label: &str,
    severity: Severity,
    guidance: &str,
    recommendations: &[&str],
) -> SeverityBand {
    SeverityBand {
        min,
        max,
        label: label.to_string(),
        severity,
        guidance: guidance.to_string(),
        recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
    }
}
