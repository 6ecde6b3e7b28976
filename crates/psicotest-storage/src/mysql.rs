//! MySQL queries. Every function takes a live pool; availability handling
//! lives in the gateway.
//!
//! Timestamps are stored as BIGINT epoch milliseconds, ids as CHAR(36),
//! `questions.options` and `test_results.recommendations` as JSON text.

use std::collections::HashMap;

use sqlx::mysql::MySqlPool;
use sqlx::{FromRow, MySql, QueryBuilder};
use uuid::Uuid;

use psicotest_core::models::answer::Answer;
use psicotest_core::models::question::{Options, Question};
use psicotest_core::models::result::TestResult;
use psicotest_core::models::stats::Stats;
use psicotest_core::models::test::{Test, TestWithQuestions};
use psicotest_core::models::user::{Role, User};
use psicotest_core::schema::{QUESTION_COLUMNS, RESULT_COLUMNS, TEST_COLUMNS, USER_COLUMNS, table};

use crate::error::StorageError;

#[derive(FromRow)]
struct UserRow {
    id: String,
    email: String,
    password_hash: String,
    name: String,
    role: String,
    is_active: bool,
    created_at: i64,
}

impl TryFrom<UserRow> for User {
    type Error = StorageError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: parse_uuid(&row.id)?,
            email: row.email,
            password_hash: row.password_hash,
            name: row.name,
            role: decoded("role", row.role.parse())?,
            is_active: row.is_active,
            created_at: timestamp(row.created_at)?,
        })
    }
}

#[derive(FromRow)]
struct TestRow {
    id: String,
    slug: String,
    title: String,
    description: String,
    category: String,
    instructions: String,
    time_limit_minutes: Option<i64>,
    is_active: bool,
    version: i64,
    created_at: i64,
}

impl TryFrom<TestRow> for Test {
    type Error = StorageError;

    fn try_from(row: TestRow) -> Result<Self, Self::Error> {
        Ok(Test {
            id: row.id,
            slug: row.slug,
            title: row.title,
            description: row.description,
            category: decoded("category", row.category.parse())?,
            instructions: row.instructions,
            time_limit_minutes: row
                .time_limit_minutes
                .map(|m| unsigned(m, "time_limit_minutes"))
                .transpose()?,
            is_active: row.is_active,
            version: unsigned(row.version, "version")?,
            created_at: timestamp(row.created_at)?,
        })
    }
}

#[derive(FromRow)]
struct QuestionRow {
    id: String,
    test_id: String,
    text: String,
    sort_order: i64,
    options: String,
}

impl TryFrom<QuestionRow> for Question {
    type Error = StorageError;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        Ok(Question {
            id: row.id,
            test_id: row.test_id,
            text: row.text,
            order: unsigned(row.sort_order, "sort_order")?,
            options: decoded("options", Options::from_json(&row.options))?,
        })
    }
}

#[derive(FromRow)]
struct ResultRow {
    id: String,
    user_id: Option<String>,
    test_id: String,
    total_score: i64,
    max_score: i64,
    percentage: i64,
    category: String,
    severity: String,
    interpretation: String,
    recommendations: String,
    completed_at: i64,
}

impl ResultRow {
    fn into_result(self, answers: Vec<Answer>) -> Result<TestResult, StorageError> {
        Ok(TestResult {
            id: parse_uuid(&self.id)?,
            user_id: self.user_id.as_deref().map(parse_uuid).transpose()?,
            test_id: self.test_id,
            total_score: unsigned(self.total_score, "total_score")?,
            max_score: unsigned(self.max_score, "max_score")?,
            percentage: unsigned(self.percentage, "percentage")?,
            category: self.category,
            severity: decoded("severity", self.severity.parse())?,
            interpretation: self.interpretation,
            recommendations: decoded(
                "recommendations",
                serde_json::from_str(&self.recommendations),
            )?,
            completed_at: timestamp(self.completed_at)?,
            answers,
        })
    }
}

#[derive(FromRow)]
struct AnswerRow {
    result_id: String,
    question_id: String,
    value: i64,
}

fn parse_uuid(raw: &str) -> Result<Uuid, StorageError> {
    Uuid::parse_str(raw).map_err(|e| StorageError::Decode(format!("bad uuid {raw:?}: {e}")))
}

fn timestamp(millis: i64) -> Result<jiff::Timestamp, StorageError> {
    jiff::Timestamp::from_millisecond(millis)
        .map_err(|e| StorageError::Decode(format!("bad timestamp {millis}: {e}")))
}

/// A stored value that fails to parse is a corrupt row, not bad input.
fn decoded<T, E: std::fmt::Display>(
    column: &str,
    parsed: Result<T, E>,
) -> Result<T, StorageError> {
    parsed.map_err(|e| StorageError::Decode(format!("{column}: {e}")))
}

fn unsigned(value: i64, column: &str) -> Result<u32, StorageError> {
    u32::try_from(value).map_err(|_| StorageError::Decode(format!("{column} out of range: {value}")))
}

// --- Users ---

pub async fn insert_user(pool: &MySqlPool, user: &User) -> Result<(), StorageError> {
    let sql = format!(
        "INSERT INTO {} ({USER_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?)",
        table::USERS
    );
    let result = sqlx::query(&sql)
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.role.as_str())
        .bind(user.is_active)
        .bind(user.created_at.as_millisecond())
        .execute(pool)
        .await;

    match result {
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            Err(StorageError::EmailTaken(user.email.clone()))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn find_user_by_email(pool: &MySqlPool, email: &str) -> Result<Option<User>, StorageError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM {} WHERE email = ?", table::USERS);
    sqlx::query_as::<_, UserRow>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?
        .map(User::try_from)
        .transpose()
}

pub async fn find_user_by_id(pool: &MySqlPool, id: Uuid) -> Result<Option<User>, StorageError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM {} WHERE id = ?", table::USERS);
    sqlx::query_as::<_, UserRow>(&sql)
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?
        .map(User::try_from)
        .transpose()
}

pub async fn list_users(pool: &MySqlPool) -> Result<Vec<User>, StorageError> {
    let sql = format!(
        "SELECT {USER_COLUMNS} FROM {} ORDER BY created_at DESC",
        table::USERS
    );
    sqlx::query_as::<_, UserRow>(&sql)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(User::try_from)
        .collect()
}

pub async fn update_user_role(pool: &MySqlPool, id: Uuid, role: Role) -> Result<bool, StorageError> {
    let sql = format!("UPDATE {} SET role = ? WHERE id = ?", table::USERS);
    let result = sqlx::query(&sql)
        .bind(role.as_str())
        .bind(id.to_string())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn update_user_active(pool: &MySqlPool, id: Uuid, active: bool) -> Result<bool, StorageError> {
    let sql = format!("UPDATE {} SET is_active = ? WHERE id = ?", table::USERS);
    let result = sqlx::query(&sql)
        .bind(active)
        .bind(id.to_string())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// --- Tests ---

pub async fn list_tests(pool: &MySqlPool, active_only: bool) -> Result<Vec<Test>, StorageError> {
    let filter = if active_only { "WHERE is_active = TRUE" } else { "" };
    let sql = format!(
        "SELECT {TEST_COLUMNS} FROM {} {filter} ORDER BY title, version DESC",
        table::TESTS
    );
    sqlx::query_as::<_, TestRow>(&sql)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(Test::try_from)
        .collect()
}

pub async fn find_test_by_id(pool: &MySqlPool, id: &str) -> Result<Option<Test>, StorageError> {
    let sql = format!("SELECT {TEST_COLUMNS} FROM {} WHERE id = ?", table::TESTS);
    sqlx::query_as::<_, TestRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(Test::try_from)
        .transpose()
}

/// The active version of a slug.
pub async fn find_test_by_slug(pool: &MySqlPool, slug: &str) -> Result<Option<Test>, StorageError> {
    let sql = format!(
        "SELECT {TEST_COLUMNS} FROM {} WHERE slug = ? AND is_active = TRUE \
         ORDER BY version DESC LIMIT 1",
        table::TESTS
    );
    sqlx::query_as::<_, TestRow>(&sql)
        .bind(slug)
        .fetch_optional(pool)
        .await?
        .map(Test::try_from)
        .transpose()
}

pub async fn list_questions(pool: &MySqlPool, test_id: &str) -> Result<Vec<Question>, StorageError> {
    let sql = format!(
        "SELECT {QUESTION_COLUMNS} FROM {} WHERE test_id = ? ORDER BY sort_order",
        table::QUESTIONS
    );
    sqlx::query_as::<_, QuestionRow>(&sql)
        .bind(test_id)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(Question::try_from)
        .collect()
}

pub async fn count_results_for_test(pool: &MySqlPool, test_id: &str) -> Result<i64, StorageError> {
    let sql = format!(
        "SELECT COUNT(*) FROM {} WHERE test_id = ?",
        table::TEST_RESULTS
    );
    Ok(sqlx::query_scalar::<_, i64>(&sql)
        .bind(test_id)
        .fetch_one(pool)
        .await?)
}

/// Insert a test and its questions in one transaction.
pub async fn insert_test(pool: &MySqlPool, test: &TestWithQuestions) -> Result<(), StorageError> {
    let mut tx = pool.begin().await?;
    insert_test_rows(&mut tx, test).await?;
    tx.commit().await?;
    Ok(())
}

/// Insert a new version of a test and deactivate the one it supersedes.
pub async fn insert_test_version(
    pool: &MySqlPool,
    test: &TestWithQuestions,
    previous_id: &str,
) -> Result<(), StorageError> {
    let mut tx = pool.begin().await?;
    let sql = format!("UPDATE {} SET is_active = FALSE WHERE id = ?", table::TESTS);
    sqlx::query(&sql).bind(previous_id).execute(&mut *tx).await?;
    insert_test_rows(&mut tx, test).await?;
    tx.commit().await?;
    Ok(())
}

async fn insert_test_rows(
    tx: &mut sqlx::Transaction<'_, MySql>,
    test: &TestWithQuestions,
) -> Result<(), StorageError> {
    let sql = format!(
        "INSERT INTO {} ({TEST_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        table::TESTS
    );
    let t = &test.test;
    sqlx::query(&sql)
        .bind(&t.id)
        .bind(&t.slug)
        .bind(&t.title)
        .bind(&t.description)
        .bind(t.category.as_str())
        .bind(&t.instructions)
        .bind(t.time_limit_minutes.map(i64::from))
        .bind(t.is_active)
        .bind(i64::from(t.version))
        .bind(t.created_at.as_millisecond())
        .execute(&mut **tx)
        .await?;

    insert_questions(tx, &test.questions).await
}

/// Overwrite a test's fields and replace its questions.
pub async fn replace_test(pool: &MySqlPool, test: &TestWithQuestions) -> Result<(), StorageError> {
    let mut tx = pool.begin().await?;

    let sql = format!(
        "UPDATE {} SET slug = ?, title = ?, description = ?, category = ?, instructions = ?, \
         time_limit_minutes = ? WHERE id = ?",
        table::TESTS
    );
    let t = &test.test;
    sqlx::query(&sql)
        .bind(&t.slug)
        .bind(&t.title)
        .bind(&t.description)
        .bind(t.category.as_str())
        .bind(&t.instructions)
        .bind(t.time_limit_minutes.map(i64::from))
        .bind(&t.id)
        .execute(&mut *tx)
        .await?;

    let sql = format!("DELETE FROM {} WHERE test_id = ?", table::QUESTIONS);
    sqlx::query(&sql).bind(&t.id).execute(&mut *tx).await?;

    insert_questions(&mut tx, &test.questions).await?;

    tx.commit().await?;
    Ok(())
}

async fn insert_questions(
    tx: &mut sqlx::Transaction<'_, MySql>,
    questions: &[Question],
) -> Result<(), StorageError> {
    let sql = format!(
        "INSERT INTO {} ({QUESTION_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?)",
        table::QUESTIONS
    );
    for q in questions {
        sqlx::query(&sql)
            .bind(&q.id)
            .bind(&q.test_id)
            .bind(&q.text)
            .bind(q.question_type().as_str())
            .bind(i64::from(q.order))
            .bind(serde_json::to_string(&q.options)?)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

pub async fn update_test_active(pool: &MySqlPool, id: &str, active: bool) -> Result<bool, StorageError> {
    let sql = format!("UPDATE {} SET is_active = ? WHERE id = ?", table::TESTS);
    let result = sqlx::query(&sql)
        .bind(active)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// --- Results ---

pub async fn insert_result(pool: &MySqlPool, result: &TestResult) -> Result<(), StorageError> {
    let mut tx = pool.begin().await?;

    let sql = format!(
        "INSERT INTO {} ({RESULT_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        table::TEST_RESULTS
    );
    sqlx::query(&sql)
        .bind(result.id.to_string())
        .bind(result.user_id.map(|id| id.to_string()))
        .bind(&result.test_id)
        .bind(i64::from(result.total_score))
        .bind(i64::from(result.max_score))
        .bind(i64::from(result.percentage))
        .bind(&result.category)
        .bind(result.severity.as_str())
        .bind(&result.interpretation)
        .bind(serde_json::to_string(&result.recommendations)?)
        .bind(result.completed_at.as_millisecond())
        .execute(&mut *tx)
        .await?;

    let sql = format!(
        "INSERT INTO {} (result_id, question_id, value) VALUES (?, ?, ?)",
        table::ANSWERS
    );
    for answer in &result.answers {
        sqlx::query(&sql)
            .bind(result.id.to_string())
            .bind(&answer.question_id)
            .bind(answer.value)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}

pub async fn find_result(pool: &MySqlPool, id: Uuid) -> Result<Option<TestResult>, StorageError> {
    let sql = format!(
        "SELECT {RESULT_COLUMNS} FROM {} WHERE id = ?",
        table::TEST_RESULTS
    );
    let Some(row) = sqlx::query_as::<_, ResultRow>(&sql)
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };

    let mut answers = load_answers(pool, std::slice::from_ref(&row.id)).await?;
    let own = answers.remove(&row.id).unwrap_or_default();
    row.into_result(own).map(Some)
}

pub async fn list_results_for_user(pool: &MySqlPool, user_id: Uuid) -> Result<Vec<TestResult>, StorageError> {
    let sql = format!(
        "SELECT {RESULT_COLUMNS} FROM {} WHERE user_id = ? ORDER BY completed_at DESC",
        table::TEST_RESULTS
    );
    let rows = sqlx::query_as::<_, ResultRow>(&sql)
        .bind(user_id.to_string())
        .fetch_all(pool)
        .await?;
    with_answers(pool, rows).await
}

pub async fn list_recent_results(pool: &MySqlPool, limit: u32) -> Result<Vec<TestResult>, StorageError> {
    let sql = format!(
        "SELECT {RESULT_COLUMNS} FROM {} ORDER BY completed_at DESC LIMIT ?",
        table::TEST_RESULTS
    );
    let rows = sqlx::query_as::<_, ResultRow>(&sql)
        .bind(i64::from(limit))
        .fetch_all(pool)
        .await?;
    with_answers(pool, rows).await
}

async fn with_answers(pool: &MySqlPool, rows: Vec<ResultRow>) -> Result<Vec<TestResult>, StorageError> {
    let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
    let mut answers = load_answers(pool, &ids).await?;
    rows.into_iter()
        .map(|row| {
            let own = answers.remove(&row.id).unwrap_or_default();
            row.into_result(own)
        })
        .collect()
}

async fn load_answers(
    pool: &MySqlPool,
    result_ids: &[String],
) -> Result<HashMap<String, Vec<Answer>>, StorageError> {
    let mut grouped: HashMap<String, Vec<Answer>> = HashMap::new();
    if result_ids.is_empty() {
        return Ok(grouped);
    }

    let mut builder: QueryBuilder<MySql> = QueryBuilder::new(format!(
        "SELECT result_id, question_id, value FROM {} WHERE result_id IN (",
        table::ANSWERS
    ));
    let mut separated = builder.separated(", ");
    for id in result_ids {
        separated.push_bind(id.as_str());
    }
    separated.push_unseparated(")");

    let rows: Vec<AnswerRow> = builder.build_query_as::<AnswerRow>().fetch_all(pool).await?;
    for row in rows {
        grouped.entry(row.result_id).or_default().push(Answer {
            question_id: row.question_id,
            value: row.value,
        });
    }
    Ok(grouped)
}

// --- Stats ---

pub async fn stats(pool: &MySqlPool) -> Result<Stats, StorageError> {
    let count = |t: &str| format!("SELECT COUNT(*) FROM {t}");
    let users: i64 = sqlx::query_scalar(&count(table::USERS)).fetch_one(pool).await?;
    let tests: i64 = sqlx::query_scalar(&count(table::TESTS)).fetch_one(pool).await?;
    let results: i64 = sqlx::query_scalar(&count(table::TEST_RESULTS))
        .fetch_one(pool)
        .await?;

    Ok(Stats {
        users: users.max(0) as u64,
        tests: tests.max(0) as u64,
        results: results.max(0) as u64,
    })
}
