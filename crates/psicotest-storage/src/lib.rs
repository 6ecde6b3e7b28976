//! psicotest-storage
//!
//! The persistence gateway. Prefers the MySQL database and falls back to
//! in-memory fixtures while the database is unreachable.

pub mod connection;
pub mod error;
pub mod fixtures;
pub mod gateway;
mod mysql;
