//! Generated stand-in network used when no remote API is configured.
//!
//! The collection is built once per [`FixtureSource`] from a seeded RNG:
//! twenty agents, a spanning tree of connections so the graph is connected,
//! and fifteen extra random edges.

use chrono::{DateTime, Duration, Utc};
use molt_protocol::{
    assign_ranks, default_avatar, Agent, Category, Connection, ConnectionKind, Status,
    TokenTransaction, TransactionKind, TOKEN_SYMBOL,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::source::{AgentSource, SourceFuture};

pub const DEFAULT_FIXTURE_SEED: u64 = 0x4d4f_4c54;
pub const EXTRA_CONNECTIONS: usize = 15;

const AGENT_NAMES: [&str; 20] = [
    "Nova", "Cipher", "Helix", "Prism", "Flux", "Zenith", "Vortex", "Echo",
    "Nexus", "Quark", "Synth", "Pulse", "Onyx", "Aether", "Drift", "Rune",
    "Shard", "Blaze", "Phantom", "Vertex",
];

// Active is weighted three to one.
const STATUS_POOL: [Status; 5] = [
    Status::Active, Status::Active, Status::Active, Status::Idle, Status::Offline,
];

const TX_DESCRIPTIONS: [&str; 5] = [
    "Tarea completada",
    "Colaboración exitosa",
    "Validación de datos",
    "Exploración de red",
    "Recompensa diaria",
];

#[derive(Debug, Clone)]
pub struct FixtureSource {
    agents: Vec<Agent>,
    connections: Vec<Connection>,
}

impl FixtureSource {
    pub fn new(seed: u64) -> Self {
        Self::generate(seed, Utc::now())
    }

    /// Fully deterministic given `seed` and `now`.
    pub fn generate(seed: u64, now: DateTime<Utc>) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let mut agents: Vec<Agent> = AGENT_NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| generate_agent(&mut rng, i, name, now))
            .collect();
        assign_ranks(&mut agents);

        let connections = generate_connections(&mut rng, &agents, now);

        tracing::debug!(
            seed,
            agents = agents.len(),
            connections = connections.len(),
            "Generated fixture network"
        );

        Self { agents, connections }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn find(&self, id: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }
}

impl Default for FixtureSource {
    fn default() -> Self {
        Self::new(DEFAULT_FIXTURE_SEED)
    }
}

fn days_ago(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(days)
}

fn generate_agent(rng: &mut StdRng, index: usize, name: &str, now: DateTime<Utc>) -> Agent {
    let category = Category::ALL[index % Category::ALL.len()];
    let mut agent = Agent {
        id: format!("agent-{index}"),
        name: name.to_string(),
        category,
        description: format!(
            "Agente {name} especializado en {category}. Contribuye activamente a la red Moltbook."
        ),
        avatar: default_avatar(name),
        balance: rng.gen_range(100..=50_000),
        symbol: TOKEN_SYMBOL.to_string(),
        total_rewards: rng.gen_range(500..=100_000),
        rank: 0,
        status: *STATUS_POOL.choose(rng).unwrap_or(&Status::Active),
        created_at: days_ago(now, rng.gen_range(30..=365)),
        token_history: Vec::new(),
    };

    let mut history = generate_history(rng, index, now);
    history.sort_by_key(|tx| tx.timestamp);
    for tx in history {
        agent.record_transaction(tx);
    }
    agent
}

fn generate_history(rng: &mut StdRng, agent_index: usize, now: DateTime<Utc>) -> Vec<TokenTransaction> {
    let count = rng.gen_range(3..=8);
    (0..count)
        .map(|i| {
            let suffix: [u8; 3] = rng.gen();
            TokenTransaction {
                id: format!("tx-{agent_index}-{i}-{}", hex::encode(suffix)),
                kind: *TransactionKind::ALL.choose(rng).unwrap_or(&TransactionKind::Reward),
                amount: rng.gen_range(10..=5_000),
                timestamp: days_ago(now, rng.gen_range(0..=30)),
                description: TX_DESCRIPTIONS.choose(rng).copied().unwrap_or_default().to_string(),
            }
        })
        .collect()
}

fn random_connection(rng: &mut StdRng, source: &Agent, target: &Agent, now: DateTime<Utc>) -> Connection {
    let kind = *ConnectionKind::ALL.choose(rng).unwrap_or(&ConnectionKind::Collaboration);
    let mut conn = Connection::new(source.id.clone(), target.id.clone(), kind, rng.gen_range(1..=10));
    conn.last_interaction = days_ago(now, rng.gen_range(0..=14));
    conn
}

fn generate_connections(rng: &mut StdRng, agents: &[Agent], now: DateTime<Utc>) -> Vec<Connection> {
    let mut connections = Vec::new();
    if agents.len() < 2 {
        return connections;
    }

    // Attach every agent to one earlier agent.
    for i in 1..agents.len() {
        let source = rng.gen_range(0..i);
        connections.push(random_connection(rng, &agents[source], &agents[i], now));
    }

    for _ in 0..EXTRA_CONNECTIONS {
        let a = rng.gen_range(0..agents.len());
        let mut b = rng.gen_range(0..agents.len());
        while b == a {
            b = rng.gen_range(0..agents.len());
        }
        connections.push(random_connection(rng, &agents[a], &agents[b], now));
    }
    connections
}

impl AgentSource for FixtureSource {
    fn list_agents(&self) -> SourceFuture<'_, Vec<Agent>> {
        Box::pin(async move { Ok(self.agents.clone()) })
    }

    fn list_connections(&self) -> SourceFuture<'_, Vec<Connection>> {
        Box::pin(async move { Ok(self.connections.clone()) })
    }

    fn get_agent<'a>(&'a self, id: &'a str) -> SourceFuture<'a, Option<Agent>> {
        Box::pin(async move { Ok(self.find(id).cloned()) })
    }

    fn describe(&self) -> String {
        format!("fixture ({} agents)", self.agents.len())
    }
}
