use psicotest_core::models::question::Question;
use psicotest_core::models::severity::Severity;
use psicotest_core::models::test::Category;

use super::{band, build_questions, likert};
use crate::scoring::SeverityBand;
use crate::Instrument;

const ID: &str = "spin";

/// SPIN: Social Phobia Inventory, 17 items rated 0–4. Total 0–68.
pub struct Spin;

impl Instrument for Spin {
    fn id(&self) -> &str {
        ID
    }

    fn slug(&self) -> &str {
        "spin"
    }

    fn name(&self) -> &str {
        "SPIN"
    }

    fn title(&self) -> &str {
        "Inventario de Fobia Social (SPIN)"
    }

    fn description(&self) -> &str {
        "Evalúa miedo, evitación y malestar fisiológico en situaciones sociales."
    }

    fn category(&self) -> Category {
        Category::SocialAnxiety
    }

    fn instructions(&self) -> &str {
        "Indique cuánto le han molestado los siguientes problemas durante la última semana."
    }

    fn questions(&self) -> &[Question] {
        static QUESTIONS: std::sync::LazyLock<Vec<Question>> = std::sync::LazyLock::new(|| {
            let items = [
                "Tengo miedo de las figuras de autoridad",
                "Me molesta ruborizarme delante de la gente",
                "Las fiestas y los acontecimientos sociales me dan miedo",
                "Evito hablar con gente que no conozco",
                "Me da mucho miedo ser criticado(a)",
                "Evito hacer cosas o hablar con gente por miedo a pasar vergüenza",
                "Me molesta sudar delante de la gente",
                "Evito ir a fiestas",
                "Evito las actividades en las que soy el centro de atención",
                "Hablar con desconocidos me da miedo",
                "Evito tener que dar discursos",
                "Haría cualquier cosa para evitar ser criticado(a)",
                "Me angustian las palpitaciones cuando estoy con gente",
                "Me da miedo hacer cosas cuando la gente puede estar mirándome",
                "Pasar vergüenza o parecer estúpido(a) están entre mis mayores miedos",
                "Evito hablar con cualquier persona con autoridad",
                "Me angustia temblar o que se note que tiemblo delante de otras personas",
            ];
            let labels = ["Nada", "Un poco", "Algo", "Mucho", "Extremadamente"];
            build_questions(ID, &items, |_| likert(&labels))
        });
        &QUESTIONS
    }

    fn bands(&self) -> &[SeverityBand] {
        static BANDS: std::sync::LazyLock<Vec<SeverityBand>> = std::sync::LazyLock::new(|| {
            vec![
                band(
                    0,
                    20,
                    "Sin ansiedad social significativa",
                    Severity::Minimal,
                    "Tus respuestas no indican ansiedad social significativa.",
                    &["No se requiere ninguna acción específica."],
                ),
                band(
                    21,
                    30,
                    "Ansiedad social leve",
                    Severity::Mild,
                    "Tus respuestas indican ansiedad social leve.",
                    &["Exponte gradualmente a situaciones sociales que te resulten manejables."],
                ),
                band(
                    31,
                    40,
                    "Ansiedad social moderada",
                    Severity::Moderate,
                    "Tus respuestas indican ansiedad social moderada.",
                    &[
                        "La terapia cognitivo-conductual es eficaz para la ansiedad social.",
                        "Considera consultar con un profesional de salud mental.",
                    ],
                ),
                band(
                    41,
                    50,
                    "Ansiedad social grave",
                    Severity::Severe,
                    "Tus respuestas indican ansiedad social grave.",
                    &["Busca una evaluación con un profesional de salud mental."],
                ),
                band(
                    51,
                    68,
                    "Ansiedad social muy grave",
                    Severity::VerySevere,
                    "Tus respuestas indican ansiedad social muy grave.",
                    &[
                        "Busca una evaluación con un profesional de salud mental lo antes posible.",
                    ],
                ),
            ]
        });
        &BANDS
    }
}
