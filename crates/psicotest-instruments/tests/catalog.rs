use std::collections::HashSet;

use psicotest_core::models::question::QuestionType;
use psicotest_instruments::scoring::validate_bands;
use psicotest_instruments::{all_instruments, get_instrument};

#[test]
fn every_instrument_partitions_its_score_range() {
    for instrument in all_instruments() {
        let max = instrument.max_score();
        validate_bands(instrument.bands(), max)
            .unwrap_or_else(|e| panic!("{}: {e}", instrument.name()));

        for score in 0..=max {
            let matching = instrument.bands().iter().filter(|b| b.contains(score)).count();
            assert_eq!(matching, 1, "{} score {score}", instrument.name());
        }
    }
}

#[test]
fn expected_item_counts_and_maxima() {
    let expected = [("phq9", 9, 27), ("gad7", 7, 21), ("spin", 17, 68), ("pss10", 10, 40)];
    for (id, items, max) in expected {
        let instrument = get_instrument(id).unwrap();
        assert_eq!(instrument.questions().len(), items, "{id}");
        assert_eq!(instrument.max_score(), max, "{id}");
    }
}

#[test]
fn options_are_valid_likert_scales() {
    for instrument in all_instruments() {
        for question in instrument.questions() {
            assert_eq!(question.question_type(), QuestionType::LikertScale);
            question.options.validate().unwrap();
            assert_eq!(question.test_id, instrument.id());
        }
    }
}

#[test]
fn ids_and_slugs_are_unique() {
    let instruments = all_instruments();
    let ids: HashSet<_> = instruments.iter().map(|i| i.id().to_string()).collect();
    let slugs: HashSet<_> = instruments.iter().map(|i| i.slug().to_string()).collect();
    assert_eq!(ids.len(), instruments.len());
    assert_eq!(slugs.len(), instruments.len());
}

#[test]
fn interpretation_is_idempotent() {
    let phq9 = get_instrument("phq9").unwrap();
    let first = phq9.interpret(12).unwrap().clone();
    let second = phq9.interpret(12).unwrap().clone();
    assert_eq!(first, second);
}

#[test]
fn to_test_carries_instrument_metadata() {
    let spin = get_instrument("spin").unwrap();
    let test = spin.to_test_with_questions();
    assert_eq!(test.test.id, "spin");
    assert_eq!(test.test.slug, "spin");
    assert!(test.test.is_active);
    assert_eq!(test.questions.len(), 17);
    assert_eq!(test.questions[0].order, 1);
}

#[test]
fn unknown_instrument_is_none() {
    assert!(get_instrument("nonexistent").is_none());
}
