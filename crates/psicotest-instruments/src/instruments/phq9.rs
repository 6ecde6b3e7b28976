use psicotest_core::models::answer::Answer;
use psicotest_core::models::question::Question;
use psicotest_core::models::severity::Severity;
use psicotest_core::models::test::Category;

use super::{band, build_questions, likert};
use crate::scoring::SeverityBand;
use crate::Instrument;

const ID: &str = "phq9";

/// Item 9 asks about thoughts of death or self-harm.
const SELF_HARM_ITEM: u32 = 9;

/// PHQ-9: Patient Health Questionnaire, 9 items.
/// Each item 0–3 over the last two weeks. Total 0–27.
pub struct Phq9;

impl Instrument for Phq9 {
    fn id(&self) -> &str {
        ID
    }

    fn slug(&self) -> &str {
        "phq-9"
    }

    fn name(&self) -> &str {
        "PHQ-9"
    }

    fn title(&self) -> &str {
        "Cuestionario de Salud del Paciente (PHQ-9)"
    }

    fn description(&self) -> &str {
        "Cribado de síntomas depresivos durante las últimas dos semanas."
    }

    fn category(&self) -> Category {
        Category::Depression
    }

    fn instructions(&self) -> &str {
        "Durante las últimas 2 semanas, ¿con qué frecuencia le han molestado los siguientes problemas?"
    }

    fn questions(&self) -> &[Question] {
        static QUESTIONS: std::sync::LazyLock<Vec<Question>> = std::sync::LazyLock::new(|| {
            let items = [
                "Poco interés o placer en hacer cosas",
                "Se ha sentido decaído(a), deprimido(a) o sin esperanzas",
                "Dificultad para quedarse o permanecer dormido(a), o ha dormido demasiado",
                "Se ha sentido cansado(a) o con poca energía",
                "Sin apetito o ha comido en exceso",
                "Se ha sentido mal con usted mismo(a), o que es un fracaso o que ha quedado mal con usted mismo(a) o con su familia",
                "Dificultad para concentrarse en ciertas actividades, tales como leer o ver la televisión",
                "¿Se ha movido o hablado tan lento que otras personas podrían haberlo notado? O lo contrario: muy inquieto(a) o agitado(a)",
                "Pensamientos de que estaría mejor muerto(a) o de lastimarse de alguna manera",
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
                    "Mínimo",
                    Severity::Minimal,
                    "Tus respuestas indican síntomas depresivos mínimos o ausentes.",
                    &["Mantén tus rutinas de sueño, actividad física y contacto social."],
                ),
                band(
                    5,
                    9,
                    "Leve",
                    Severity::Mild,
                    "Tus respuestas indican síntomas depresivos leves.",
                    &[
                        "Observa cómo evolucionan tus síntomas en las próximas semanas.",
                        "Considera repetir este cuestionario en dos semanas.",
                    ],
                ),
                band(
                    10,
                    14,
                    "Moderado",
                    Severity::Moderate,
                    "Tus respuestas indican síntomas depresivos moderados.",
                    &[
                        "Consulta con un profesional de salud mental para una evaluación.",
                        "Habla con alguien de confianza sobre cómo te sientes.",
                    ],
                ),
                band(
                    15,
                    19,
                    "Moderadamente grave",
                    Severity::ModeratelySevere,
                    "Tus respuestas indican síntomas depresivos moderadamente graves.",
                    &[
                        "Busca una evaluación con un profesional de salud mental pronto.",
                        "El tratamiento psicológico o farmacológico puede ayudarte.",
                    ],
                ),
                band(
                    20,
                    27,
                    "Grave",
                    Severity::Severe,
                    "Tus respuestas indican síntomas depresivos graves.",
                    &[
                        "Contacta con un profesional de salud mental lo antes posible.",
                        "Si sientes que estás en peligro, llama a los servicios de emergencia.",
                    ],
                ),
            ]
        });
        &BANDS
    }

    fn safety_notes(&self, questions: &[Question], answers: &[Answer]) -> Vec<String> {
        let Some(item) = questions.iter().find(|q| q.order == SELF_HARM_ITEM) else {
            return Vec::new();
        };
        let endorsed = answers
            .iter()
            .rev()
            .find(|a| a.question_id == item.id)
            .is_some_and(|a| a.value > 0);

        if endorsed {
            vec![
                "Has indicado pensamientos de hacerte daño. Habla hoy mismo con un profesional o \
                 llama a una línea de atención en crisis o a los servicios de emergencia."
                    .to_string(),
            ]
        } else {
            Vec::new()
        }
    }
}
