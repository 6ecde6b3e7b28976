//! psicotest-core
//!
//! Pure domain types and table conventions. No database or network
//! dependency; this is the shared vocabulary of the psicotest system.

pub mod error;
pub mod models;
pub mod schema;
