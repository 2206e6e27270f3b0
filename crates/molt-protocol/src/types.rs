use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    default_avatar, MAX_CONNECTION_STRENGTH, MIN_CONNECTION_STRENGTH, TOKEN_SYMBOL,
};
use crate::ProtocolError;

/// Specialisation of an agent within the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Researcher,
    Creator,
    Trader,
    Validator,
    Explorer,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Researcher,
        Category::Creator,
        Category::Trader,
        Category::Validator,
        Category::Explorer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Researcher => "researcher",
            Self::Creator => "creator",
            Self::Trader => "trader",
            Self::Validator => "validator",
            Self::Explorer => "explorer",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ProtocolError::UnknownVariant {
                kind: "category",
                value: s.to_string(),
            })
    }
}

/// Liveness of an agent as last reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Active,
    Idle,
    Offline,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Active, Status::Idle, Status::Offline];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Idle => "idle",
            Self::Offline => "offline",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a token movement in an agent's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Reward,
    Transfer,
    Stake,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 3] = [
        TransactionKind::Reward,
        TransactionKind::Transfer,
        TransactionKind::Stake,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reward => "reward",
            Self::Transfer => "transfer",
            Self::Stake => "stake",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nature of the relation between two agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    Collaboration,
    Learning,
    Trade,
    Mentorship,
}

impl ConnectionKind {
    pub const ALL: [ConnectionKind; 4] = [
        ConnectionKind::Collaboration,
        ConnectionKind::Learning,
        ConnectionKind::Trade,
        ConnectionKind::Mentorship,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collaboration => "collaboration",
            Self::Learning => "learning",
            Self::Trade => "trade",
            Self::Mentorship => "mentorship",
        }
    }
}

impl std::fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entry in an agent's token history. Recorded once, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenTransaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
}

impl TokenTransaction {
    pub fn new(
        kind: TransactionKind,
        amount: u64,
        description: impl Into<String>,
    ) -> Result<Self, ProtocolError> {
        if amount == 0 {
            return Err(ProtocolError::InvalidAmount(amount));
        }
        Ok(Self {
            id: format!("tx-{}", Uuid::new_v4().simple()),
            kind,
            amount,
            timestamp: Utc::now(),
            description: description.into(),
        })
    }
}

/// A participant in the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(rename = "memecoinBalance")]
    pub balance: u64,
    #[serde(rename = "memecoinSymbol", default = "default_symbol")]
    pub symbol: String,
    #[serde(default)]
    pub total_rewards: u64,
    /// 1 = highest balance in the snapshot. Written only by [`assign_ranks`].
    #[serde(default)]
    pub rank: u32,
    #[serde(default)]
    pub status: Status,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub token_history: Vec<TokenTransaction>,
}

fn default_symbol() -> String {
    TOKEN_SYMBOL.to_string()
}

impl Agent {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: Category, balance: u64) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            avatar: default_avatar(&name),
            name,
            category,
            description: String::new(),
            balance,
            symbol: default_symbol(),
            total_rewards: 0,
            rank: 0,
            status: Status::Active,
            created_at: Utc::now(),
            token_history: Vec::new(),
        }
    }

    /// Append a transaction to the history. Rewards also accrue to
    /// `total_rewards`, which therefore never decreases.
    pub fn record_transaction(&mut self, tx: TokenTransaction) {
        if tx.kind == TransactionKind::Reward {
            self.total_rewards = self.total_rewards.saturating_add(tx.amount);
        }
        self.token_history.push(tx);
    }

    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }
}

/// Sort agents by descending balance (stable) and rewrite `rank` as 1..=N.
pub fn assign_ranks(agents: &mut [Agent]) {
    agents.sort_by(|a, b| b.balance.cmp(&a.balance));
    for (i, agent) in agents.iter_mut().enumerate() {
        agent.rank = i as u32 + 1;
    }
}

/// An edge in the agent network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: ConnectionKind,
    /// Visual weight only, 1..=10.
    pub strength: u8,
    pub last_interaction: DateTime<Utc>,
}

impl Connection {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        kind: ConnectionKind,
        strength: u8,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
            strength: strength.clamp(MIN_CONNECTION_STRENGTH, MAX_CONNECTION_STRENGTH),
            last_interaction: Utc::now(),
        }
    }

    /// Strength clamped into range, for values that arrived over the wire.
    pub fn effective_strength(&self) -> u8 {
        self.strength.clamp(MIN_CONNECTION_STRENGTH, MAX_CONNECTION_STRENGTH)
    }

    pub fn touches(&self, agent_id: &str) -> bool {
        self.source == agent_id || self.target == agent_id
    }
}
