//! The persistence gateway.
//!
//! Every operation runs against MySQL when the current snapshot has a pool
//! and against the [`FixtureStore`] otherwise. A connectivity error during a
//! query marks the manager unavailable and the operation is answered from
//! fixtures; any other error is returned to the caller.

use std::sync::Arc;

use sqlx::mysql::MySqlPool;
use tracing::{info, warn};
use uuid::Uuid;

use psicotest_auth::error::AuthError;
use psicotest_auth::password::PasswordHasher;
use psicotest_core::models::question::Question;
use psicotest_core::models::result::{NewTestResult, TestResult};
use psicotest_core::models::stats::Stats;
use psicotest_core::models::test::{NewTest, Test, TestWithQuestions};
use psicotest_core::models::user::{Role, User, UserProfile, normalize_email};
use psicotest_core::schema;
use psicotest_instruments::get_instrument;

use crate::connection::{Availability, ConnectionManager};
use crate::error::StorageError;
use crate::fixtures::FixtureStore;
use crate::mysql;

pub struct Gateway {
    connections: Arc<ConnectionManager>,
    fixtures: FixtureStore,
    hasher: PasswordHasher,
}

impl Gateway {
    pub fn new(connections: Arc<ConnectionManager>, hasher: PasswordHasher) -> Self {
        Self {
            connections,
            fixtures: FixtureStore::new(),
            hasher,
        }
    }

    pub fn connections(&self) -> &Arc<ConnectionManager> {
        &self.connections
    }

    pub fn availability(&self) -> Availability {
        self.connections.availability()
    }

    /// The live pool, probing first if nothing has probed yet.
    async fn pool_for(&self, operation: &'static str) -> Option<MySqlPool> {
        let snapshot = self.connections.ensure_probed().await;
        if snapshot.pool.is_none() {
            warn!(operation, "database unavailable, serving fixtures");
        }
        snapshot.pool.clone()
    }

    /// Decide whether a failed query falls back to fixtures.
    fn degrade(&self, operation: &'static str, err: StorageError) -> Result<(), StorageError> {
        if err.is_connectivity() {
            warn!(operation, error = %err, "lost database connection, serving fixtures");
            self.connections.mark_unavailable();
            Ok(())
        } else {
            Err(err)
        }
    }

    // --- Users ---

    /// Register a user. Emails are normalised before the uniqueness check.
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<UserProfile, StorageError> {
        let hasher = self.hasher;
        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password)).await?;

        let user = User {
            id: Uuid::new_v4(),
            email: normalize_email(email),
            password_hash,
            name: name.trim().to_string(),
            role: Role::User,
            is_active: true,
            created_at: jiff::Timestamp::now(),
        };
        let profile = UserProfile::from(&user);

        if let Some(pool) = self.pool_for("create_user").await {
            match mysql::insert_user(&pool, &user).await {
                Ok(()) => return Ok(profile),
                Err(e) => self.degrade("create_user", e)?,
            }
        }
        self.fixtures.insert_user(user).await?;
        Ok(profile)
    }

    /// Check credentials. Unknown emails, inactive accounts and wrong
    /// passwords all yield `None`.
    pub async fn authenticate_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<UserProfile>, StorageError> {
        let Some(user) = self.find_user_by_email(&normalize_email(email)).await? else {
            return Ok(None);
        };
        if !user.is_active {
            info!(user_id = %user.id, "login attempt on inactive account");
            return Ok(None);
        }

        let hasher = self.hasher;
        let password = password.to_string();
        let encoded = user.password_hash.clone();
        let verified =
            tokio::task::spawn_blocking(move || hasher.verify(&password, &encoded)).await?;

        match verified {
            Ok(true) => Ok(Some(UserProfile::from(&user))),
            Ok(false) => Ok(None),
            Err(AuthError::MalformedHash) => {
                warn!(user_id = %user.id, "stored password hash is malformed");
                Ok(None)
            }
            Err(e) => Err(StorageError::Decode(e.to_string())),
        }
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        if let Some(pool) = self.pool_for("find_user_by_email").await {
            match mysql::find_user_by_email(&pool, email).await {
                Ok(user) => return Ok(user),
                Err(e) => self.degrade("find_user_by_email", e)?,
            }
        }
        Ok(self.fixtures.user_by_email(email).await)
    }

    pub async fn get_user_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, StorageError> {
        if let Some(pool) = self.pool_for("get_user_by_id").await {
            match mysql::find_user_by_id(&pool, id).await {
                Ok(user) => return Ok(user.as_ref().map(UserProfile::from)),
                Err(e) => self.degrade("get_user_by_id", e)?,
            }
        }
        Ok(self.fixtures.user_by_id(id).await.as_ref().map(UserProfile::from))
    }

    pub async fn list_users(&self) -> Result<Vec<UserProfile>, StorageError> {
        if let Some(pool) = self.pool_for("list_users").await {
            match mysql::list_users(&pool).await {
                Ok(users) => return Ok(users.iter().map(UserProfile::from).collect()),
                Err(e) => self.degrade("list_users", e)?,
            }
        }
        Ok(self.fixtures.users().await.iter().map(UserProfile::from).collect())
    }

    pub async fn set_user_role(&self, id: Uuid, role: Role) -> Result<Option<UserProfile>, StorageError> {
        if let Some(pool) = self.pool_for("set_user_role").await {
            let updated = async {
                mysql::update_user_role(&pool, id, role).await?;
                mysql::find_user_by_id(&pool, id).await
            };
            match updated.await {
                Ok(user) => return Ok(user.as_ref().map(UserProfile::from)),
                Err(e) => self.degrade("set_user_role", e)?,
            }
        }
        Ok(self.fixtures.set_user_role(id, role).await.as_ref().map(UserProfile::from))
    }

    pub async fn set_user_active(&self, id: Uuid, active: bool) -> Result<Option<UserProfile>, StorageError> {
        if let Some(pool) = self.pool_for("set_user_active").await {
            let updated = async {
                mysql::update_user_active(&pool, id, active).await?;
                mysql::find_user_by_id(&pool, id).await
            };
            match updated.await {
                Ok(user) => return Ok(user.as_ref().map(UserProfile::from)),
                Err(e) => self.degrade("set_user_active", e)?,
            }
        }
        Ok(self.fixtures.set_user_active(id, active).await.as_ref().map(UserProfile::from))
    }

    // --- Tests ---

    /// Active tests.
    pub async fn get_tests(&self) -> Result<Vec<Test>, StorageError> {
        self.list_tests("get_tests", true).await
    }

    /// Every test including inactive and superseded versions.
    pub async fn list_all_tests(&self) -> Result<Vec<Test>, StorageError> {
        self.list_tests("list_all_tests", false).await
    }

    async fn list_tests(&self, operation: &'static str, active_only: bool) -> Result<Vec<Test>, StorageError> {
        if let Some(pool) = self.pool_for(operation).await {
            match mysql::list_tests(&pool, active_only).await {
                Ok(tests) => return Ok(tests),
                Err(e) => self.degrade(operation, e)?,
            }
        }
        Ok(self.fixtures.tests(active_only).await)
    }

    pub async fn get_test_by_id(&self, id: &str) -> Result<Option<Test>, StorageError> {
        if let Some(pool) = self.pool_for("get_test_by_id").await {
            match mysql::find_test_by_id(&pool, id).await {
                Ok(test) => return Ok(test),
                Err(e) => self.degrade("get_test_by_id", e)?,
            }
        }
        Ok(self.fixtures.test_by_id(id).await)
    }

    /// The active version of a slug.
    pub async fn get_test_by_slug(&self, slug: &str) -> Result<Option<Test>, StorageError> {
        if let Some(pool) = self.pool_for("get_test_by_slug").await {
            match mysql::find_test_by_slug(&pool, slug).await {
                Ok(test) => return Ok(test),
                Err(e) => self.degrade("get_test_by_slug", e)?,
            }
        }
        Ok(self.fixtures.test_by_slug(slug).await)
    }

    /// Questions in presentation order. Unknown ids yield an empty list.
    pub async fn get_questions_by_test_id(&self, test_id: &str) -> Result<Vec<Question>, StorageError> {
        if let Some(pool) = self.pool_for("get_questions_by_test_id").await {
            match mysql::list_questions(&pool, test_id).await {
                Ok(questions) => return Ok(questions),
                Err(e) => self.degrade("get_questions_by_test_id", e)?,
            }
        }
        Ok(self.fixtures.questions(test_id).await)
    }

    pub async fn create_test(&self, new: NewTest) -> Result<TestWithQuestions, StorageError> {
        new.validate()?;
        let slug = new.slug.trim().to_string();
        if self.get_test_by_slug(&slug).await?.is_some() {
            return Err(StorageError::SlugTaken(slug));
        }

        let test = build_test(
            Uuid::new_v4().to_string(),
            slug,
            1,
            jiff::Timestamp::now(),
            true,
            new,
        );

        if let Some(pool) = self.pool_for("create_test").await {
            match mysql::insert_test(&pool, &test).await {
                Ok(()) => return Ok(test),
                Err(e) => self.degrade("create_test", e)?,
            }
        }
        self.fixtures.insert_test(test.clone()).await;
        Ok(test)
    }

    /// Edit a test. A test that already has results is left untouched and
    /// superseded by a new version with the same slug; otherwise the edit
    /// applies in place. The slug never changes.
    ///
    /// Built-in instruments keep their published items and bands, so edits
    /// to them are refused with [`StorageError::BuiltInTest`].
    pub async fn update_test(&self, id: &str, new: NewTest) -> Result<Option<TestWithQuestions>, StorageError> {
        new.validate()?;
        if let Some(existing) = self.get_test_by_id(id).await? {
            if get_instrument(&existing.slug).is_some() {
                return Err(StorageError::BuiltInTest(existing.slug));
            }
        }

        if let Some(pool) = self.pool_for("update_test").await {
            match update_test_in_db(&pool, id, new.clone()).await {
                Ok(test) => return Ok(test),
                Err(e) => self.degrade("update_test", e)?,
            }
        }

        let Some(existing) = self.fixtures.test_by_id(id).await else {
            return Ok(None);
        };
        if self.fixtures.has_results(id).await {
            let test = next_version(&existing, new);
            self.fixtures.set_test_active(id, false).await;
            self.fixtures.insert_test(test.clone()).await;
            Ok(Some(test))
        } else {
            let test = in_place(&existing, new);
            self.fixtures.replace_test(test.clone()).await;
            Ok(Some(test))
        }
    }

    pub async fn set_test_active(&self, id: &str, active: bool) -> Result<Option<Test>, StorageError> {
        if let Some(pool) = self.pool_for("set_test_active").await {
            let updated = async {
                mysql::update_test_active(&pool, id, active).await?;
                mysql::find_test_by_id(&pool, id).await
            };
            match updated.await {
                Ok(test) => return Ok(test),
                Err(e) => self.degrade("set_test_active", e)?,
            }
        }
        Ok(self.fixtures.set_test_active(id, active).await)
    }

    // --- Results ---

    /// Persist a scored attempt, assigning its id and completion time.
    pub async fn save_test_result(&self, new: NewTestResult) -> Result<TestResult, StorageError> {
        let result = new.into_result(Uuid::new_v4(), jiff::Timestamp::now());

        if let Some(pool) = self.pool_for("save_test_result").await {
            match mysql::insert_result(&pool, &result).await {
                Ok(()) => return Ok(result),
                Err(e) => self.degrade("save_test_result", e)?,
            }
        }
        self.fixtures.insert_result(result.clone()).await;
        Ok(result)
    }

    /// A user's results, newest first.
    pub async fn get_user_test_results(&self, user_id: Uuid) -> Result<Vec<TestResult>, StorageError> {
        if let Some(pool) = self.pool_for("get_user_test_results").await {
            match mysql::list_results_for_user(&pool, user_id).await {
                Ok(results) => return Ok(results),
                Err(e) => self.degrade("get_user_test_results", e)?,
            }
        }
        Ok(self.fixtures.results_for_user(user_id).await)
    }

    pub async fn get_test_result(&self, id: Uuid) -> Result<Option<TestResult>, StorageError> {
        if let Some(pool) = self.pool_for("get_test_result").await {
            match mysql::find_result(&pool, id).await {
                Ok(result) => return Ok(result),
                Err(e) => self.degrade("get_test_result", e)?,
            }
        }
        Ok(self.fixtures.result(id).await)
    }

    /// All results, newest first.
    pub async fn list_all_results(&self, limit: u32) -> Result<Vec<TestResult>, StorageError> {
        if let Some(pool) = self.pool_for("list_all_results").await {
            match mysql::list_recent_results(&pool, limit).await {
                Ok(results) => return Ok(results),
                Err(e) => self.degrade("list_all_results", e)?,
            }
        }
        Ok(self.fixtures.recent_results(limit).await)
    }

    pub async fn stats(&self) -> Result<Stats, StorageError> {
        if let Some(pool) = self.pool_for("stats").await {
            match mysql::stats(&pool).await {
                Ok(stats) => return Ok(stats),
                Err(e) => self.degrade("stats", e)?,
            }
        }
        Ok(self.fixtures.stats().await)
    }
}

async fn update_test_in_db(
    pool: &MySqlPool,
    id: &str,
    new: NewTest,
) -> Result<Option<TestWithQuestions>, StorageError> {
    let Some(existing) = mysql::find_test_by_id(pool, id).await? else {
        return Ok(None);
    };

    if mysql::count_results_for_test(pool, id).await? > 0 {
        let test = next_version(&existing, new);
        mysql::insert_test_version(pool, &test, id).await?;
        info!(
            previous = id,
            test_id = %test.test.id,
            version = test.test.version,
            "test superseded by new version"
        );
        Ok(Some(test))
    } else {
        let test = in_place(&existing, new);
        mysql::replace_test(pool, &test).await?;
        Ok(Some(test))
    }
}

fn next_version(existing: &Test, new: NewTest) -> TestWithQuestions {
    build_test(
        Uuid::new_v4().to_string(),
        existing.slug.clone(),
        existing.version + 1,
        jiff::Timestamp::now(),
        true,
        new,
    )
}

fn in_place(existing: &Test, new: NewTest) -> TestWithQuestions {
    build_test(
        existing.id.clone(),
        existing.slug.clone(),
        existing.version,
        existing.created_at,
        existing.is_active,
        new,
    )
}

fn build_test(
    id: String,
    slug: String,
    version: u32,
    created_at: jiff::Timestamp,
    is_active: bool,
    new: NewTest,
) -> TestWithQuestions {
    let questions = new
        .questions
        .into_iter()
        .enumerate()
        .map(|(i, q)| {
            let order = i as u32 + 1;
            Question {
                id: schema::question_id(&id, order),
                test_id: id.clone(),
                text: q.text.trim().to_string(),
                order,
                options: q.options,
            }
        })
        .collect();

    TestWithQuestions {
        test: Test {
            id,
            slug,
            title: new.title.trim().to_string(),
            description: new.description,
            category: new.category,
            instructions: new.instructions,
            time_limit_minutes: new.time_limit_minutes,
            is_active,
            version,
            created_at,
        },
        questions,
    }
}
