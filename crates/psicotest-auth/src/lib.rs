//! psicotest-auth
//!
//! Password hashing and signed session tokens.

pub mod error;
pub mod jwt;
pub mod password;
