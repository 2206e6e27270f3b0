use molt_protocol::{Agent, Connection, TOKEN_SYMBOL};
use serde::{Deserialize, Serialize};

use crate::derive::format_compact;

/// Aggregate figures shown in the network header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStats {
    pub agent_count: usize,
    pub total_balance: u64,
    pub connection_count: usize,
    pub active_count: usize,
}

impl NetworkStats {
    pub fn compute(agents: &[Agent], connections: &[Connection]) -> Self {
        Self {
            agent_count: agents.len(),
            total_balance: agents.iter().map(|a| a.balance).fold(0u64, u64::saturating_add),
            connection_count: connections.len(),
            active_count: agents.iter().filter(|a| a.is_active()).count(),
        }
    }

    /// Label/value pairs in display order.
    pub fn rows(&self) -> Vec<(String, String)> {
        vec![
            ("Agentes".to_string(), self.agent_count.to_string()),
            (format!("Total {TOKEN_SYMBOL}"), format_compact(self.total_balance)),
            ("Conexiones".to_string(), self.connection_count.to_string()),
            ("Activos".to_string(), self.active_count.to_string()),
        ]
    }
}
