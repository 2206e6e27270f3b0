//! Last-known-good snapshot over any [`AgentSource`].
//!
//! A refresh that fails keeps the previous snapshot. If nothing has loaded
//! yet, the built-in fixture is installed instead, so readers always have
//! something to show. Each refresh takes a ticket; a result whose ticket is
//! older than the one already applied is discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use molt_protocol::{assign_ranks, Agent, Connection};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::Result;
use crate::fixture::{FixtureSource, DEFAULT_FIXTURE_SEED};
use crate::source::AgentSource;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Where the current snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOrigin {
    /// Loaded from the configured source.
    Source,
    /// Built-in fixture installed because the first load failed.
    Fallback,
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Ranked by descending balance.
    pub agents: Vec<Agent>,
    pub connections: Vec<Connection>,
    pub fetched_at: DateTime<Utc>,
    pub origin: SnapshotOrigin,
}

impl Snapshot {
    fn new(mut agents: Vec<Agent>, connections: Vec<Connection>, origin: SnapshotOrigin) -> Self {
        assign_ranks(&mut agents);
        Self {
            agents,
            connections,
            fetched_at: Utc::now(),
            origin,
        }
    }

    pub fn agent(&self, id: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }
}

pub struct SnapshotFeed {
    source: Arc<dyn AgentSource>,
    fallback_seed: u64,
    next_ticket: AtomicU64,
    /// Ticket of the snapshot currently published; 0 = none or fallback.
    applied_ticket: Mutex<u64>,
    current: watch::Sender<Option<Arc<Snapshot>>>,
}

impl SnapshotFeed {
    pub fn new(source: Arc<dyn AgentSource>) -> Self {
        Self::with_fallback_seed(source, DEFAULT_FIXTURE_SEED)
    }

    pub fn with_fallback_seed(source: Arc<dyn AgentSource>, fallback_seed: u64) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            source,
            fallback_seed,
            next_ticket: AtomicU64::new(1),
            applied_ticket: Mutex::new(0),
            current,
        }
    }

    /// Snapshot currently published, if any refresh has completed.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current.borrow().clone()
    }

    /// Receiver notified every time a new snapshot is published.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Snapshot>>> {
        self.current.subscribe()
    }

    /// Current snapshot, refreshing first if nothing has been loaded.
    pub async fn snapshot(&self) -> Arc<Snapshot> {
        match self.current() {
            Some(snapshot) => snapshot,
            None => self.refresh().await,
        }
    }

    async fn fetch(&self) -> Result<(Vec<Agent>, Vec<Connection>)> {
        tokio::try_join!(self.source.list_agents(), self.source.list_connections())
    }

    /// Fetch from the source and publish the result. Never fails: on error
    /// the previous snapshot (or the fallback fixture) is returned.
    pub async fn refresh(&self) -> Arc<Snapshot> {
        let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst);
        let result = self.fetch().await;

        let mut applied = self.applied_ticket.lock().await;
        match result {
            Ok((agents, connections)) => {
                if ticket < *applied {
                    tracing::debug!(ticket, applied = *applied, "Discarding superseded snapshot");
                } else {
                    let snapshot = Arc::new(Snapshot::new(agents, connections, SnapshotOrigin::Source));
                    tracing::info!(
                        source = %self.source.describe(),
                        agents = snapshot.agents.len(),
                        connections = snapshot.connections.len(),
                        "Snapshot refreshed"
                    );
                    *applied = ticket;
                    self.current.send_replace(Some(snapshot));
                }
            }
            Err(e) => {
                tracing::warn!(source = %self.source.describe(), error = %e, "Snapshot refresh failed");
                if self.current.borrow().is_none() {
                    tracing::warn!(seed = self.fallback_seed, "Installing built-in fixture snapshot");
                    let fixture = FixtureSource::new(self.fallback_seed);
                    let snapshot = Snapshot::new(
                        fixture.agents().to_vec(),
                        fixture.connections().to_vec(),
                        SnapshotOrigin::Fallback,
                    );
                    self.current.send_replace(Some(Arc::new(snapshot)));
                }
            }
        }
        drop(applied);

        // Some(..) is guaranteed: every branch above publishes or a snapshot existed.
        self.current().unwrap_or_else(|| {
            Arc::new(Snapshot::new(Vec::new(), Vec::new(), SnapshotOrigin::Fallback))
        })
    }

    /// Look up an agent in the current snapshot, loading one if needed.
    pub async fn agent(&self, id: &str) -> Option<Agent> {
        self.snapshot().await.agent(id).cloned()
    }

    /// Refresh on a fixed interval until the returned handle is aborted.
    /// The first tick fires immediately.
    pub fn spawn_polling(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let snapshot = self.refresh().await;
                tracing::debug!(
                    origin = ?snapshot.origin,
                    fetched_at = %snapshot.fetched_at,
                    "Poll tick complete"
                );
            }
        })
    }
}
