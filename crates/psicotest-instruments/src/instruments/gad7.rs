use psicotest_core::models::question::Question;
use psicotest_core::models::severity::Severity;
use psicotest_core::models::test::Category;

use super::{band, build_questions, likert};
use crate::scoring::SeverityBand;
use crate::Instrument;

const ID: &str = "gad7";

/// GAD-7: Generalized Anxiety Disorder scale, 7 items rated 0–3. Total 0–21.
pub struct Gad7;

impl Instrument for Gad7 {
    fn id(&self) -> &str {
        ID
    }

    fn slug(&self) -> &str {
        "gad-7"
    }

    fn name(&self) -> &str {
        "GAD-7"
    }

    fn title(&self) -> &str {
        "Escala de Ansiedad Generalizada (GAD-7)"
    }

    fn description(&self) -> &str {
        "Cribado de síntomas de ansiedad generalizada durante las últimas dos semanas."
    }

    fn category(&self) -> Category {
        Category::Anxiety
    }

    fn instructions(&self) -> &str {
        "Durante las últimas 2 semanas, ¿con qué frecuencia le han molestado los siguientes problemas?"
    }

    fn questions(&self) -> &[Question] {
        static QUESTIONS: std::sync::LazyLock<Vec<Question>> = std::sync::LazyLock::new(|| {
            let items = [
                "Sentirse nervioso(a), ansioso(a) o con los nervios de punta",
                "No poder dejar de preocuparse o no poder controlar la preocupación",
                "Preocuparse demasiado por diferentes cosas",
                "Dificultad para relajarse",
                "Estar tan inquieto(a) que es difícil permanecer sentado(a) tranquilamente",
                "Molestarse o ponerse irritable fácilmente",
                "Sentir miedo como si algo terrible fuera a pasar",
            ];
            let labels = [
                "Ningún día",
                "Varios días",
                "Más de la mitad de los días",
                "Casi todos los días",
            ];
            build_questions(ID, &items, |_| likert(&labels))
        });
        &QUESTIONS
    }

    fn bands(&self) -> &[SeverityBand] {
        static BANDS: std::sync::LazyLock<Vec<SeverityBand>> = std::sync::LazyLock::new(|| {
            vec![
                band(
                    0,
                    4,
                    "Ansiedad mínima",
                    Severity::Minimal,
                    "Tus respuestas indican síntomas de ansiedad mínimos.",
                    &["Sigue cuidando tus hábitos de descanso y de manejo del estrés."],
                ),
                band(
                    5,
                    9,
                    "Ansiedad leve",
                    Severity::Mild,
                    "Tus respuestas indican síntomas de ansiedad leves.",
                    &[
                        "Prueba técnicas de respiración o relajación a diario.",
                        "Vuelve a realizar el cuestionario si los síntomas persisten.",
                    ],
                ),
                band(
                    10,
                    14,
                    "Ansiedad moderada",
                    Severity::Moderate,
                    "Tus respuestas indican síntomas de ansiedad moderados.",
                    &[
                        "Considera consultar con un profesional de salud mental.",
                        "Reduce el consumo de cafeína y mantén horarios de sueño regulares.",
                    ],
                ),
                band(
                    15,
                    21,
                    "Ansiedad grave",
                    Severity::Severe,
                    "Tus respuestas indican síntomas de ansiedad graves.",
                    &[
                        "Busca una evaluación profesional lo antes posible.",
                        "Si la ansiedad se vuelve inmanejable, acude a un servicio de urgencias.",
                    ],
                ),
            ]
        });
        &BANDS
    }
}
