//! Relational layout conventions.
//!
//! Table and column names shared by the MySQL queries. The tables
//! themselves are created outside this codebase.

pub mod table {
    pub const USERS: &str = "users";
    pub const TESTS: &str = "tests";
    pub const QUESTIONS: &str = "questions";
    pub const TEST_RESULTS: &str = "test_results";
    pub const ANSWERS: &str = "answers";
}

pub const USER_COLUMNS: &str = "id, email, password_hash, name, role, is_active, created_at";

pub const TEST_COLUMNS: &str = "id, slug, title, description, category, instructions, \
     time_limit_minutes, is_active, version, created_at";

pub const QUESTION_COLUMNS: &str = "id, test_id, text, question_type, sort_order, options";

pub const RESULT_COLUMNS: &str = "id, user_id, test_id, total_score, max_score, percentage, \
     category, severity, interpretation, recommendations, completed_at";

/// Id prefix for questions of a test: `{test_id}-q{order}`.
pub fn question_id(test_id: &str, order: u32) -> String {
    format!("{test_id}-q{order}")
}
