use psicotest_bedrock::error::BedrockError;
use psicotest_bedrock::parse::parse_reply;
use psicotest_instruments::error::InterpretError;

const OBJECT: &str = r#"{"label": "Moderado", "text": "Tus síntomas son moderados.", "recommendations": ["Habla con alguien de confianza.", "Consulta con un profesional."]}"#;

#[test]
fn bare_json() {
    let parsed = parse_reply(OBJECT).unwrap();
    assert_eq!(parsed.label, "Moderado");
    assert_eq!(parsed.recommendations.len(), 2);
}

#[test]
fn fenced_json_block() {
    let reply = format!("Aquí tienes la interpretación:\n```json\n{OBJECT}\n```\nEspero que ayude.");
    let parsed = parse_reply(&reply).unwrap();
    assert_eq!(parsed.text, "Tus síntomas son moderados.");
}

#[test]
fn object_embedded_in_prose() {
    let reply = format!("Claro. {OBJECT} Cuídate.");
    let parsed = parse_reply(&reply).unwrap();
    assert_eq!(parsed.label, "Moderado");
}

#[test]
fn missing_recommendations_default_to_empty() {
    let parsed = parse_reply(r#"{"text": "Todo en orden."}"#).unwrap();
    assert!(parsed.recommendations.is_empty());
    assert!(parsed.label.is_empty());
}

#[test]
fn prose_without_json_is_rejected() {
    let err = parse_reply("Lo siento, no puedo ayudar con eso.").unwrap_err();
    assert!(matches!(err, BedrockError::ResponseParse(_)));
}

#[test]
fn empty_text_is_rejected() {
    let err = parse_reply(r#"{"label": "Leve", "text": "  "}"#).unwrap_err();
    assert!(matches!(err, BedrockError::ResponseParse(_)));
}

#[test]
fn errors_map_onto_interpret_errors() {
    let parse: InterpretError = BedrockError::ResponseParse("bad".to_string()).into();
    assert!(matches!(parse, InterpretError::ResponseParse(_)));

    let timeout: InterpretError = BedrockError::Timeout(20).into();
    assert!(matches!(timeout, InterpretError::Invocation(msg) if msg.contains("20s")));
}
