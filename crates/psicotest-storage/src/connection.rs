//! Database reachability.
//!
//! A [`ConnectionManager`] owns the MySQL pool and publishes its state as an
//! immutable [`Snapshot`] through a `watch` channel. Readers clone the
//! current `Arc<Snapshot>`; probes replace it wholesale.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::error::StorageError;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Applied to every probe, both connecting and pinging.
    pub connect_timeout: Duration,
    pub probe_interval: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "mysql://root@localhost:3306/psicotest".to_string(),
            max_connections: 10,
            connect_timeout: Duration::from_secs(5),
            probe_interval: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Unknown,
    Probing,
    Available,
    Unavailable,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Unknown => "unknown",
            Availability::Probing => "probing",
            Availability::Available => "available",
            Availability::Unavailable => "unavailable",
        }
    }

    /// No probe has completed yet.
    pub fn is_pending(&self) -> bool {
        matches!(self, Availability::Unknown | Availability::Probing)
    }
}

/// Availability and pool, always published together.
///
/// `pool` is `Some` exactly when `availability` is `Available`.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub availability: Availability,
    pub pool: Option<MySqlPool>,
    pub changed_at: jiff::Timestamp,
}

impl Snapshot {
    fn new(availability: Availability, pool: Option<MySqlPool>) -> Self {
        Self {
            availability,
            pool,
            changed_at: jiff::Timestamp::now(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.availability == Availability::Available
    }
}

pub struct ConnectionManager {
    config: DatabaseConfig,
    options: MySqlConnectOptions,
    state: watch::Sender<Arc<Snapshot>>,
    probe_lock: Mutex<()>,
}

impl ConnectionManager {
    /// Create a manager in the `Unknown` state. Nothing connects until the
    /// first probe.
    pub fn new(config: DatabaseConfig) -> Result<Self, StorageError> {
        let options = MySqlConnectOptions::from_str(&config.url)
            .map_err(|e| StorageError::Config(e.to_string()))?;
        let (state, _) = watch::channel(Arc::new(Snapshot::new(Availability::Unknown, None)));
        Ok(Self {
            config,
            options,
            state,
            probe_lock: Mutex::new(()),
        })
    }

    /// Create a manager that starts `Available` with an existing pool. The
    /// pool is not checked until the next probe.
    pub fn with_pool(config: DatabaseConfig, pool: MySqlPool) -> Result<Self, StorageError> {
        let manager = Self::new(config)?;
        manager.publish(Availability::Available, Some(pool));
        Ok(manager)
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.state.borrow().clone()
    }

    pub fn availability(&self) -> Availability {
        self.state.borrow().availability
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.state.subscribe()
    }

    /// Probe only if no probe has finished yet. Callers arriving while the
    /// first probe is in flight wait for its outcome.
    pub async fn ensure_probed(&self) -> Arc<Snapshot> {
        let current = self.snapshot();
        if !current.availability.is_pending() {
            return current;
        }
        let _guard = self.probe_lock.lock().await;
        // Pending here means no probe ran yet or the one awaited was cancelled.
        if self.availability().is_pending() {
            self.probe_locked().await;
        }
        self.snapshot()
    }

    /// Re-check the database and publish the outcome.
    ///
    /// An available pool is pinged with `SELECT 1`; otherwise a new pool is
    /// built.
    pub async fn probe(&self) -> Availability {
        let _guard = self.probe_lock.lock().await;
        self.probe_locked().await
    }

    async fn probe_locked(&self) -> Availability {
        let current = self.snapshot();

        if let Some(pool) = &current.pool {
            match self.ping(pool).await {
                Ok(()) => {
                    debug!("database ping ok");
                    return Availability::Available;
                }
                Err(reason) => {
                    warn!(reason = %reason, "database ping failed");
                    self.publish(Availability::Unavailable, None);
                    return Availability::Unavailable;
                }
            }
        }

        if current.availability.is_pending() {
            self.publish(Availability::Probing, None);
        }
        match self.connect().await {
            Ok(pool) => {
                self.publish(Availability::Available, Some(pool));
                Availability::Available
            }
            Err(reason) => {
                warn!(reason = %reason, "database unreachable, serving fixtures");
                self.publish(Availability::Unavailable, None);
                Availability::Unavailable
            }
        }
    }

    /// Called when a query hit a connectivity error. Drops the pool until
    /// the next probe succeeds.
    pub fn mark_unavailable(&self) {
        let changed = self.state.send_if_modified(|snapshot| {
            if snapshot.availability != Availability::Available {
                return false;
            }
            *snapshot = Arc::new(Snapshot::new(Availability::Unavailable, None));
            true
        });
        if changed {
            warn!("database marked unavailable");
        }
    }

    /// Re-probe on a fixed interval. The first tick fires immediately.
    pub fn spawn_probe_loop(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.config.probe_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                self.probe().await;
            }
        })
    }

    async fn connect(&self) -> Result<MySqlPool, String> {
        let connect = MySqlPoolOptions::new()
            .max_connections(self.config.max_connections)
            .acquire_timeout(self.config.connect_timeout)
            .connect_with(self.options.clone());

        match tokio::time::timeout(self.config.connect_timeout, connect).await {
            Ok(Ok(pool)) => Ok(pool),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!(
                "connect timed out after {}s",
                self.config.connect_timeout.as_secs()
            )),
        }
    }

    async fn ping(&self, pool: &MySqlPool) -> Result<(), String> {
        let ping = sqlx::query("SELECT 1").execute(pool);
        match tokio::time::timeout(self.config.connect_timeout, ping).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err("ping timed out".to_string()),
        }
    }

    fn publish(&self, availability: Availability, pool: Option<MySqlPool>) {
        let previous = self.state.borrow().availability;
        self.state.send_replace(Arc::new(Snapshot::new(availability, pool)));
        if previous != availability {
            info!(
                from = previous.as_str(),
                to = availability.as_str(),
                "database availability changed"
            );
        }
    }
}
