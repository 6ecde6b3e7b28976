use psicotest_core::models::question::Question;
use psicotest_core::models::severity::Severity;
use psicotest_core::models::test::Category;

use super::{band, build_questions, likert, likert_reversed};
use crate::scoring::SeverityBand;
use crate::Instrument;

const ID: &str = "pss10";

/// Positively worded items, scored in reverse (1-based).
const REVERSED_ITEMS: [usize; 4] = [4, 5, 7, 8];

/// PSS-10: Perceived Stress Scale, 10 items rated 0–4. Items 4, 5, 7 and 8
/// are reverse-keyed. Total 0–40.
pub struct Pss10;

impl Instrument for Pss10 {
    fn id(&self) -> &str {
        ID
    }

    fn slug(&self) -> &str {
        "pss-10"
    }

    fn name(&self) -> &str {
        "PSS-10"
    }

    fn title(&self) -> &str {
        "Escala de Estrés Percibido (PSS-10)"
    }

    fn description(&self) -> &str {
        "Mide el grado en que las situaciones de la vida se perciben como estresantes."
    }

    fn category(&self) -> Category {
        Category::Stress
    }

    fn instructions(&self) -> &str {
        "Las preguntas se refieren a sus sentimientos y pensamientos durante el último mes."
    }

    fn questions(&self) -> &[Question] {
        static QUESTIONS: std::sync::LazyLock<Vec<Question>> = std::sync::LazyLock::new(|| {
            let items = [
                "¿Con qué frecuencia se ha sentido afectado(a) por algo que ocurrió inesperadamente?",
                "¿Con qué frecuencia se ha sentido incapaz de controlar las cosas importantes de su vida?",
                "¿Con qué frecuencia se ha sentido nervioso(a) o estresado(a)?",
                "¿Con qué frecuencia ha estado seguro(a) de su capacidad para manejar sus problemas personales?",
                "¿Con qué frecuencia ha sentido que las cosas le van bien?",
                "¿Con qué frecuencia ha sentido que no podía afrontar todas las cosas que tenía que hacer?",
                "¿Con qué frecuencia ha podido controlar las dificultades de su vida?",
                "¿Con qué frecuencia ha sentido que tenía todo bajo control?",
                "¿Con qué frecuencia ha estado enfadado(a) porque las cosas que le han ocurrido estaban fuera de su control?",
                "¿Con qué frecuencia ha sentido que las dificultades se acumulan tanto que no puede superarlas?",
            ];
            let labels = ["Nunca", "Casi nunca", "De vez en cuando", "A menudo", "Muy a menudo"];
            build_questions(ID, &items, |i| {
                if REVERSED_ITEMS.contains(&(i + 1)) {
                    likert_reversed(&labels)
                } else {
                    likert(&labels)
                }
            })
        });
        &QUESTIONS
    }

    fn bands(&self) -> &[SeverityBand] {
        static BANDS: std::sync::LazyLock<Vec<SeverityBand>> = std::sync::LazyLock::new(|| {
            vec![
                band(
                    0,
                    13,
                    "Estrés bajo",
                    Severity::Minimal,
                    "Tu nivel de estrés percibido es bajo.",
                    &["Mantén las estrategias que te están funcionando."],
                ),
                band(
                    14,
                    26,
                    "Estrés moderado",
                    Severity::Moderate,
                    "Tu nivel de estrés percibido es moderado.",
                    &[
                        "Reserva momentos de descanso y actividad física en tu semana.",
                        "Identifica las fuentes de estrés que puedes reducir o delegar.",
                    ],
                ),
                band(
                    27,
                    40,
                    "Estrés alto",
                    Severity::Severe,
                    "Tu nivel de estrés percibido es alto.",
                    &[
                        "Considera hablar con un profesional sobre estrategias de afrontamiento.",
                        "Vigila señales de agotamiento como insomnio o irritabilidad persistente.",
                    ],
                ),
            ]
        });
        &BANDS
    }
}
