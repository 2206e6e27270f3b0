use std::cmp::Ordering;
use std::str::FromStr;

use molt_protocol::{Agent, ProtocolError};
use serde::{Deserialize, Serialize};

/// Number of agents shown in the compact ranking list beside the map.
pub const RANKING_LIST_SIZE: usize = 10;

/// Ordering selected in the filter bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Rank,
    Balance,
    Name,
}

impl FromStr for SortKey {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rank" => Ok(Self::Rank),
            "balance" => Ok(Self::Balance),
            "name" => Ok(Self::Name),
            other => Err(ProtocolError::UnknownVariant {
                kind: "sort key",
                value: other.to_string(),
            }),
        }
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Return a sorted copy. All orderings are stable.
pub fn sort_agents(agents: &[Agent], key: SortKey) -> Vec<Agent> {
    let mut sorted = agents.to_vec();
    match key {
        SortKey::Rank => sorted.sort_by_key(|a| a.rank),
        SortKey::Balance => sorted.sort_by(|a, b| b.balance.cmp(&a.balance)),
        SortKey::Name => sorted.sort_by(|a, b| compare_names(&a.name, &b.name)),
    }
    sorted
}

/// First `RANKING_LIST_SIZE` agents under `key`.
pub fn top_ranked(agents: &[Agent], key: SortKey) -> Vec<Agent> {
    let mut sorted = sort_agents(agents, key);
    sorted.truncate(RANKING_LIST_SIZE);
    sorted
}
