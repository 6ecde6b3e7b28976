//! psicotest-server
//!
//! HTTP API over the gateway, the scoring pipeline and the interpreters.

pub mod audit;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        // Accounts
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/me", get(routes::auth::me))
        // Catalog
        .route("/api/tests", get(routes::tests::list_tests))
        .route("/api/tests/{slug}", get(routes::tests::get_test))
        // Results (submitting works anonymously)
        .route(
            "/api/results",
            post(routes::results::submit_result).get(routes::results::list_results),
        )
        .route("/api/results/{id}", get(routes::results::get_result))
        // Administration
        .route("/api/admin/users", get(routes::admin::list_users))
        .route("/api/admin/users/{id}/role", put(routes::admin::set_user_role))
        .route("/api/admin/users/{id}/active", put(routes::admin::set_user_active))
        .route(
            "/api/admin/tests",
            get(routes::admin::list_tests).post(routes::admin::create_test),
        )
        .route("/api/admin/tests/{id}", put(routes::admin::update_test))
        .route("/api/admin/tests/{id}/active", put(routes::admin::set_test_active))
        .route("/api/admin/results", get(routes::admin::list_results))
        .route("/api/admin/stats", get(routes::admin::stats))
        .layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::authenticate,
        ))
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}
