//! Prompt construction.

use std::fmt::Write;

use psicotest_instruments::interpret::InterpretRequest;

/// Instructs the model to answer with a single JSON object.
pub const SYSTEM_PROMPT: &str = "\
Eres un asistente que explica resultados de cuestionarios de autoevaluación psicológica. \
No diagnosticas. Escribe en español, en segunda persona, con un tono cálido y prudente. \
Responde únicamente con un objeto JSON con esta forma: \
{\"label\": string, \"text\": string, \"recommendations\": [string]}. \
\"text\" tiene como máximo tres frases. \"recommendations\" tiene entre dos y cuatro elementos. \
Si la puntuación indica gravedad alta, recomienda consultar con un profesional de salud mental.";

/// Describe the score and the instrument's bands to the model.
pub fn build_user_message(request: &InterpretRequest) -> String {
    let mut message = String::new();
    let _ = writeln!(message, "Cuestionario: {}", request.test_title);
    let _ = writeln!(message, "Categoría: {}", request.category);
    let _ = writeln!(
        message,
        "Puntuación: {} de {} ({}%)",
        request.score,
        request.max_score,
        request.percentage()
    );

    if !request.bands.is_empty() {
        let _ = writeln!(message, "Rangos de interpretación:");
        for band in &request.bands {
            let marker = if band.contains(request.score) { " <- puntuación actual" } else { "" };
            let _ = writeln!(message, "- {}–{}: {}{marker}", band.min, band.max, band.label);
        }
    }

    message
}
