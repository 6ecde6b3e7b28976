use axum::Json;
use axum::extract::State;
use serde::Serialize;

use psicotest_storage::connection::Availability;

use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    status: &'static str,
    database: Availability,
    interpreter: String,
}

/// Liveness plus the database availability. Never probes.
pub async fn health_check(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        database: state.gateway.availability(),
        interpreter: psicotest_instruments::interpret::Interpreter::name(state.interpreter.as_ref())
            .to_string(),
    })
}
