//! Top-K ranking of agents by balance.
//!
//! Entries carry three presentation metrics (weekly change, tasks completed,
//! collaborations) that are not part of the agent record. They are derived
//! from a hash of the agent id, so rebuilding the leaderboard for the same
//! snapshot shows the same numbers.

use chrono::{DateTime, Utc};
use molt_protocol::{Agent, Category, Status};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::derive::{tier_of, BalanceTier};

pub const LEADERBOARD_SIZE: usize = 20;
pub const PODIUM_SIZE: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub category: Category,
    pub balance: u64,
    pub total_rewards: u64,
    /// 1-based position in this leaderboard.
    pub rank: u32,
    pub tier: BalanceTier,
    pub status: Status,
    pub description: String,
    pub created_at: DateTime<Utc>,
    /// Percentage, one decimal.
    pub weekly_change: f64,
    pub tasks_completed: u32,
    pub collaborations: u32,
}

impl LeaderboardEntry {
    pub fn is_gaining(&self) -> bool {
        self.weekly_change >= 0.0
    }
}

/// Presentation metrics attached to a leaderboard entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticMetrics {
    pub weekly_change: f64,
    pub tasks_completed: u32,
    pub collaborations: u32,
}

impl SyntheticMetrics {
    pub fn for_agent(agent_id: &str) -> Self {
        let digest = Sha256::digest(agent_id.as_bytes());
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&digest);
        let mut rng = StdRng::from_seed(seed);

        let raw_change = rng.gen::<f64>() * 40.0 - 10.0;
        Self {
            weekly_change: (raw_change * 10.0).round() / 10.0,
            tasks_completed: rng.gen_range(20..520),
            collaborations: rng.gen_range(5..155),
        }
    }
}

pub fn build_leaderboard(agents: &[Agent]) -> Vec<LeaderboardEntry> {
    build_leaderboard_with(agents, LEADERBOARD_SIZE)
}

/// Stable sort by descending balance, keep the first `size`, number them 1..=len.
pub fn build_leaderboard_with(agents: &[Agent], size: usize) -> Vec<LeaderboardEntry> {
    let mut sorted: Vec<&Agent> = agents.iter().collect();
    sorted.sort_by(|a, b| b.balance.cmp(&a.balance));

    sorted
        .into_iter()
        .take(size)
        .enumerate()
        .map(|(i, agent)| {
            let metrics = SyntheticMetrics::for_agent(&agent.id);
            LeaderboardEntry {
                id: agent.id.clone(),
                name: agent.name.clone(),
                avatar: agent.avatar.clone(),
                category: agent.category,
                balance: agent.balance,
                total_rewards: agent.total_rewards,
                rank: i as u32 + 1,
                tier: tier_of(agent.balance),
                status: agent.status,
                description: agent.description.clone(),
                created_at: agent.created_at,
                weekly_change: metrics.weekly_change,
                tasks_completed: metrics.tasks_completed,
                collaborations: metrics.collaborations,
            }
        })
        .collect()
}

/// The first three entries.
pub fn podium(entries: &[LeaderboardEntry]) -> &[LeaderboardEntry] {
    &entries[..entries.len().min(PODIUM_SIZE)]
}

/// Everything below the podium.
pub fn remaining(entries: &[LeaderboardEntry]) -> &[LeaderboardEntry] {
    &entries[entries.len().min(PODIUM_SIZE)..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_within_ranges() {
        for i in 0..200 {
            let m = SyntheticMetrics::for_agent(&format!("agent-{i}"));
            assert!(m.weekly_change >= -10.0 && m.weekly_change <= 30.0);
            assert!((20..520).contains(&m.tasks_completed));
            assert!((5..155).contains(&m.collaborations));
        }
    }

    #[test]
    fn test_metrics_stable_per_agent() {
        assert_eq!(
            SyntheticMetrics::for_agent("agent-7"),
            SyntheticMetrics::for_agent("agent-7")
        );
    }

    #[test]
    fn test_weekly_change_one_decimal() {
        let m = SyntheticMetrics::for_agent("agent-1");
        let scaled = m.weekly_change * 10.0;
        assert!((scaled - scaled.round()).abs() < 1e-9);
    }
}
