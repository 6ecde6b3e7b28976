//! In-memory data served while the database is unreachable.
//!
//! Seeded with the built-in instrument catalog. Users, results and tests
//! written in fallback mode live here until the process exits.

use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use psicotest_core::models::question::Question;
use psicotest_core::models::result::TestResult;
use psicotest_core::models::stats::Stats;
use psicotest_core::models::test::{Test, TestWithQuestions};
use psicotest_core::models::user::{Role, User};
use psicotest_instruments::all_instruments;

use crate::error::StorageError;

#[derive(Default)]
struct FixtureData {
    tests: Vec<TestWithQuestions>,
    /// Keyed by normalised email.
    users: HashMap<String, User>,
    results: Vec<TestResult>,
}

pub struct FixtureStore {
    data: RwLock<FixtureData>,
}

impl Default for FixtureStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureStore {
    pub fn new() -> Self {
        let tests = all_instruments()
            .iter()
            .map(|i| i.to_test_with_questions())
            .collect();
        Self {
            data: RwLock::new(FixtureData {
                tests,
                ..Default::default()
            }),
        }
    }

    // --- Users ---

    pub async fn insert_user(&self, user: User) -> Result<(), StorageError> {
        let mut data = self.data.write().await;
        if data.users.contains_key(&user.email) {
            return Err(StorageError::EmailTaken(user.email));
        }
        data.users.insert(user.email.clone(), user);
        Ok(())
    }

    pub async fn user_by_email(&self, email: &str) -> Option<User> {
        self.data.read().await.users.get(email).cloned()
    }

    pub async fn user_by_id(&self, id: Uuid) -> Option<User> {
        self.data
            .read()
            .await
            .users
            .values()
            .find(|u| u.id == id)
            .cloned()
    }

    pub async fn users(&self) -> Vec<User> {
        let mut users: Vec<User> = self.data.read().await.users.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        users
    }

    pub async fn update_user(&self, id: Uuid, apply: impl FnOnce(&mut User)) -> Option<User> {
        let mut data = self.data.write().await;
        let user = data.users.values_mut().find(|u| u.id == id)?;
        apply(user);
        Some(user.clone())
    }

    pub async fn set_user_role(&self, id: Uuid, role: Role) -> Option<User> {
        self.update_user(id, |u| u.role = role).await
    }

    pub async fn set_user_active(&self, id: Uuid, active: bool) -> Option<User> {
        self.update_user(id, |u| u.is_active = active).await
    }

    // --- Tests ---

    pub async fn tests(&self, active_only: bool) -> Vec<Test> {
        self.data
            .read()
            .await
            .tests
            .iter()
            .filter(|t| !active_only || t.test.is_active)
            .map(|t| t.test.clone())
            .collect()
    }

    pub async fn test_by_id(&self, id: &str) -> Option<Test> {
        self.data
            .read()
            .await
            .tests
            .iter()
            .find(|t| t.test.id == id)
            .map(|t| t.test.clone())
    }

    pub async fn test_by_slug(&self, slug: &str) -> Option<Test> {
        self.data
            .read()
            .await
            .tests
            .iter()
            .filter(|t| t.test.slug == slug && t.test.is_active)
            .max_by_key(|t| t.test.version)
            .map(|t| t.test.clone())
    }

    pub async fn questions(&self, test_id: &str) -> Vec<Question> {
        self.data
            .read()
            .await
            .tests
            .iter()
            .find(|t| t.test.id == test_id)
            .map(|t| t.questions.clone())
            .unwrap_or_default()
    }

    pub async fn has_results(&self, test_id: &str) -> bool {
        self.data
            .read()
            .await
            .results
            .iter()
            .any(|r| r.test_id == test_id)
    }

    pub async fn insert_test(&self, test: TestWithQuestions) {
        self.data.write().await.tests.push(test);
    }

    /// Replace a stored test by id. Returns false if it does not exist.
    pub async fn replace_test(&self, test: TestWithQuestions) -> bool {
        let mut data = self.data.write().await;
        match data.tests.iter_mut().find(|t| t.test.id == test.test.id) {
            Some(slot) => {
                *slot = test;
                true
            }
            None => false,
        }
    }

    pub async fn set_test_active(&self, id: &str, active: bool) -> Option<Test> {
        let mut data = self.data.write().await;
        let stored = data.tests.iter_mut().find(|t| t.test.id == id)?;
        stored.test.is_active = active;
        Some(stored.test.clone())
    }

    // --- Results ---

    pub async fn insert_result(&self, result: TestResult) {
        self.data.write().await.results.push(result);
    }

    pub async fn result(&self, id: Uuid) -> Option<TestResult> {
        self.data
            .read()
            .await
            .results
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    pub async fn results_for_user(&self, user_id: Uuid) -> Vec<TestResult> {
        let mut results: Vec<TestResult> = self
            .data
            .read()
            .await
            .results
            .iter()
            .filter(|r| r.user_id == Some(user_id))
            .cloned()
            .collect();
        results.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        results
    }

    pub async fn recent_results(&self, limit: u32) -> Vec<TestResult> {
        let mut results = self.data.read().await.results.clone();
        results.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        results.truncate(limit as usize);
        results
    }

    pub async fn stats(&self) -> Stats {
        let data = self.data.read().await;
        Stats {
            users: data.users.len() as u64,
            tests: data.tests.len() as u64,
            results: data.results.len() as u64,
        }
    }
}
