use std::future::Future;
use std::pin::Pin;

use molt_protocol::{Agent, Connection};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fixture::{FixtureSource, DEFAULT_FIXTURE_SEED};
use crate::remote::{RemoteConfig, RemoteSource};

pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Read access to an agent network snapshot.
///
/// Each call is a single independent read; implementations do not cache,
/// retry or paginate.
pub trait AgentSource: Send + Sync {
    fn list_agents(&self) -> SourceFuture<'_, Vec<Agent>>;

    fn list_connections(&self) -> SourceFuture<'_, Vec<Connection>>;

    /// `Ok(None)` when no agent has this id.
    fn get_agent<'a>(&'a self, id: &'a str) -> SourceFuture<'a, Option<Agent>>;

    /// Short human-readable description for logs.
    fn describe(&self) -> String;
}

/// Which source to read from. Chosen explicitly at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SourceConfig {
    Fixture {
        #[serde(default = "default_seed")]
        seed: u64,
    },
    Remote(RemoteConfig),
}

fn default_seed() -> u64 {
    DEFAULT_FIXTURE_SEED
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Fixture { seed: DEFAULT_FIXTURE_SEED }
    }
}

/// The two mutually exclusive source modes behind one type.
pub enum DataSource {
    Fixture(FixtureSource),
    Remote(RemoteSource),
}

impl DataSource {
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        let source = match config {
            SourceConfig::Fixture { seed } => DataSource::Fixture(FixtureSource::new(*seed)),
            SourceConfig::Remote(remote) => DataSource::Remote(RemoteSource::new(remote.clone())?),
        };
        tracing::info!(source = %source.describe(), "Data source selected");
        Ok(source)
    }

    fn inner(&self) -> &dyn AgentSource {
        match self {
            DataSource::Fixture(s) => s,
            DataSource::Remote(s) => s,
        }
    }
}

impl AgentSource for DataSource {
    fn list_agents(&self) -> SourceFuture<'_, Vec<Agent>> {
        self.inner().list_agents()
    }

    fn list_connections(&self) -> SourceFuture<'_, Vec<Connection>> {
        self.inner().list_connections()
    }

    fn get_agent<'a>(&'a self, id: &'a str) -> SourceFuture<'a, Option<Agent>> {
        self.inner().get_agent(id)
    }

    fn describe(&self) -> String {
        self.inner().describe()
    }
}
