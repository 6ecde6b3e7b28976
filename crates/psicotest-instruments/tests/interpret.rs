use std::future::Future;
use std::pin::Pin;

use psicotest_core::models::answer::Answer;
use psicotest_core::models::severity::Severity;
use psicotest_core::models::test::Category;
use psicotest_instruments::error::InterpretError;
use psicotest_instruments::{Instrument, get_instrument};
use psicotest_instruments::interpret::{
    InterpretRequest, Interpretation, InterpretationSource, Interpreter, RuleBasedInterpreter,
    WithFallback,
};

struct Failing;

impl Interpreter for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    fn explain<'a>(
        &'a self,
        _request: &'a InterpretRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Interpretation, InterpretError>> + Send + 'a>> {
        Box::pin(async { Err(InterpretError::Invocation("service unreachable".to_string())) })
    }
}

struct Canned;

impl Interpreter for Canned {
    fn name(&self) -> &str {
        "canned"
    }

    fn explain<'a>(
        &'a self,
        _request: &'a InterpretRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Interpretation, InterpretError>> + Send + 'a>> {
        Box::pin(async {
            Ok(Interpretation {
                label: "Moderado".to_string(),
                severity: Severity::Moderate,
                text: "texto generado".to_string(),
                recommendations: vec!["una".to_string()],
                source: InterpretationSource::LanguageModel,
            })
        })
    }
}

fn phq9_request(score: u32) -> InterpretRequest {
    let phq9 = get_instrument("phq9").unwrap();
    InterpretRequest {
        test_title: phq9.title().to_string(),
        category: phq9.category(),
        score,
        max_score: phq9.max_score(),
        bands: phq9.bands().to_vec(),
    }
}

#[tokio::test]
async fn rules_use_instrument_bands() {
    let interpretation = RuleBasedInterpreter.explain(&phq9_request(27)).await.unwrap();
    assert_eq!(interpretation.label, "Grave");
    assert_eq!(interpretation.severity, Severity::Severe);
    assert_eq!(interpretation.source, InterpretationSource::Rules);
    assert!(!interpretation.recommendations.is_empty());
}

#[test]
fn rules_without_bands_use_percentage() {
    let request = InterpretRequest {
        test_title: "Cuestionario de prueba".to_string(),
        category: Category::Burnout,
        score: 30,
        max_score: 40,
        bands: Vec::new(),
    };
    let interpretation = RuleBasedInterpreter.interpret(&request).unwrap();
    assert_eq!(interpretation.severity, Severity::Severe);
    assert!(interpretation.text.contains("75%"));
}

#[test]
fn rules_fail_on_unclassified_score() {
    let mut request = phq9_request(27);
    request.bands.pop();
    let err = RuleBasedInterpreter.interpret(&request).unwrap_err();
    assert!(matches!(err, InterpretError::Instrument(_)));
}

#[tokio::test]
async fn failing_primary_falls_back_to_rules() {
    let interpreter = WithFallback::new(Failing);
    let interpretation = interpreter.interpret(&phq9_request(0)).await.unwrap();
    assert_eq!(interpretation.label, "Mínimo");
    assert_eq!(interpretation.source, InterpretationSource::Rules);
}

#[tokio::test]
async fn working_primary_is_used() {
    let interpreter = WithFallback::new(Canned);
    let interpretation = interpreter.interpret(&phq9_request(12)).await.unwrap();
    assert_eq!(interpretation.source, InterpretationSource::LanguageModel);
}

#[tokio::test]
async fn rules_only_never_calls_a_primary() {
    let interpreter = WithFallback::<Canned>::rules_only();
    assert!(!interpreter.has_primary());
    let interpretation = interpreter.interpret(&phq9_request(12)).await.unwrap();
    assert_eq!(interpretation.label, "Moderado");
    assert_eq!(interpretation.source, InterpretationSource::Rules);
}

#[test]
fn phq9_flags_self_harm_item() {
    let phq9 = get_instrument("phq9").unwrap();
    let answers = vec![Answer {
        question_id: "phq9-q9".to_string(),
        value: 1,
    }];
    assert_eq!(phq9.safety_notes(phq9.questions(), &answers).len(), 1);
    assert!(phq9.safety_notes(phq9.questions(), &[]).is_empty());

    let gad7 = get_instrument("gad7").unwrap();
    assert!(gad7.safety_notes(gad7.questions(), &answers).is_empty());
}

#[test]
fn self_harm_item_is_found_by_order_in_stored_copies() {
    let phq9 = get_instrument("phq-9").unwrap();
    let stored: Vec<_> = phq9
        .questions()
        .iter()
        .cloned()
        .map(|mut q| {
            q.id = format!("copia-q{}", q.order);
            q.test_id = "copia".to_string();
            q
        })
        .collect();

    let answers = vec![Answer {
        question_id: "copia-q9".to_string(),
        value: 3,
    }];
    assert_eq!(phq9.safety_notes(&stored, &answers).len(), 1);

    let original_ids = vec![Answer {
        question_id: "phq9-q9".to_string(),
        value: 3,
    }];
    assert!(phq9.safety_notes(&stored, &original_ids).is_empty());
}
