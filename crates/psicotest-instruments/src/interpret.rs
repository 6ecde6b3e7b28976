//! Turning a total score into something a person can read.
//!
//! [`Interpreter`] is the seam for external interpreters (a hosted language
//! model); [`RuleBasedInterpreter`] is always available and is what
//! [`WithFallback`] answers with whenever the primary fails.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use tracing::warn;
use ts_rs::TS;

use psicotest_core::models::severity::Severity;
use psicotest_core::models::test::Category;

use crate::error::InterpretError;
use crate::scoring::{self, SeverityBand};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Everything an interpreter may look at.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpretRequest {
    pub test_title: String,
    pub category: Category,
    pub score: u32,
    pub max_score: u32,
    /// Instrument-specific bands. Empty for tests without validated cut-offs,
    /// in which case the percentage bands apply.
    pub bands: Vec<SeverityBand>,
}

impl InterpretRequest {
    pub fn percentage(&self) -> u32 {
        scoring::percentage(self.score, self.max_score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum InterpretationSource {
    Rules,
    LanguageModel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Interpretation {
    pub label: String,
    pub severity: Severity,
    pub text: String,
    pub recommendations: Vec<String>,
    pub source: InterpretationSource,
}

/// Trait implemented by each way of explaining a score.
///
/// Methods return boxed futures for dyn compatibility.
pub trait Interpreter: Send + Sync {
    /// Short name for logs (e.g. "rules", "bedrock").
    fn name(&self) -> &str;

    fn explain<'a>(
        &'a self,
        request: &'a InterpretRequest,
    ) -> BoxFuture<'a, Result<Interpretation, InterpretError>>;
}

/// Static score-to-band mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedInterpreter;

impl RuleBasedInterpreter {
    /// Synchronous form of [`Interpreter::explain`].
    pub fn interpret(&self, request: &InterpretRequest) -> Result<Interpretation, InterpretError> {
        if request.bands.is_empty() {
            return Ok(percentage_interpretation(request));
        }

        let band = scoring::classify(request.score, &request.bands)?;
        Ok(Interpretation {
            label: band.label.clone(),
            severity: band.severity,
            text: band.guidance.clone(),
            recommendations: band.recommendations.clone(),
            source: InterpretationSource::Rules,
        })
    }
}

impl Interpreter for RuleBasedInterpreter {
    fn name(&self) -> &str {
        "rules"
    }

    fn explain<'a>(
        &'a self,
        request: &'a InterpretRequest,
    ) -> BoxFuture<'a, Result<Interpretation, InterpretError>> {
        Box::pin(std::future::ready(self.interpret(request)))
    }
}

/// Generic bands on the percentage of the maximum score.
fn percentage_interpretation(request: &InterpretRequest) -> Interpretation {
    let pct = request.percentage();
    let (label, severity) = match pct {
        0..=24 => ("Nivel mínimo", Severity::Minimal),
        25..=49 => ("Nivel leve", Severity::Mild),
        50..=74 => ("Nivel moderado", Severity::Moderate),
        _ => ("Nivel elevado", Severity::Severe),
    };

    Interpretation {
        label: label.to_string(),
        severity,
        text: format!(
            "Has obtenido {} de {} puntos ({pct}%) en {}.",
            request.score, request.max_score, request.test_title
        ),
        recommendations: category_recommendations(request.category, severity),
        source: InterpretationSource::Rules,
    }
}

fn category_recommendations(category: Category, severity: Severity) -> Vec<String> {
    let mut recommendations = Vec::new();

    let focus = match category {
        Category::Depression => "Mantén contacto con personas de confianza y actividades que disfrutes.",
        Category::Anxiety | Category::SocialAnxiety => {
            "Practica técnicas de respiración y exposición gradual a lo que te preocupa."
        }
        Category::Stress | Category::Burnout => {
            "Revisa tu carga de trabajo y reserva tiempo para descansar."
        }
        Category::Adhd => "Usa listas, recordatorios y bloques cortos de trabajo.",
        Category::Ocd => "Observa qué situaciones disparan los pensamientos repetitivos.",
        Category::Other => "Presta atención a cómo evolucionan tus síntomas.",
    };
    recommendations.push(focus.to_string());

    if severity >= Severity::Moderate {
        recommendations.push(
            "Considera consultar con un profesional de salud mental para una evaluación completa."
                .to_string(),
        );
    }
    recommendations.push(
        "Este resultado es orientativo y no sustituye un diagnóstico profesional.".to_string(),
    );
    recommendations
}

/// Try `primary`, answering with the rules when it fails or is absent.
pub struct WithFallback<P> {
    primary: Option<P>,
    rules: RuleBasedInterpreter,
}

impl<P: Interpreter> WithFallback<P> {
    pub fn new(primary: P) -> Self {
        Self {
            primary: Some(primary),
            rules: RuleBasedInterpreter,
        }
    }

    pub fn rules_only() -> Self {
        Self {
            primary: None,
            rules: RuleBasedInterpreter,
        }
    }

    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    pub async fn interpret(&self, request: &InterpretRequest) -> Result<Interpretation, InterpretError> {
        if let Some(primary) = &self.primary {
            match primary.explain(request).await {
                Ok(interpretation) => return Ok(interpretation),
                Err(e) => {
                    warn!(
                        interpreter = primary.name(),
                        error = %e,
                        "interpreter failed, using rule-based interpretation"
                    );
                }
            }
        }
        self.rules.interpret(request)
    }
}

impl<P: Interpreter> Interpreter for WithFallback<P> {
    fn name(&self) -> &str {
        match &self.primary {
            Some(primary) => primary.name(),
            None => self.rules.name(),
        }
    }

    fn explain<'a>(
        &'a self,
        request: &'a InterpretRequest,
    ) -> BoxFuture<'a, Result<Interpretation, InterpretError>> {
        Box::pin(self.interpret(request))
    }
}
