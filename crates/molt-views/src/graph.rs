//! Node/edge projection of the agent network for a force-directed layout.
//!
//! Nodes are filtered first; an edge survives only when both of its
//! endpoints are among the surviving nodes.

use std::collections::HashSet;

use molt_protocol::{Agent, Category, Connection, ConnectionKind, Status};
use serde::{Deserialize, Deserializer, Serialize};

use crate::derive::{balance_color, edge_width};

pub const MIN_NODE_SIZE: f64 = 4.0;
pub const NODE_SCALE: f64 = 2.0;

/// User-controlled filters of the network map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphFilter {
    /// Case-insensitive substring of the agent name. Empty matches all.
    #[serde(default)]
    pub search: String,
    /// `None` matches every category. An empty value or `"all"` decodes as `None`.
    #[serde(default, deserialize_with = "category_or_all")]
    pub category: Option<Category>,
}

fn category_or_all<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Category>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("all") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

impl GraphFilter {
    pub fn new(search: impl Into<String>, category: Option<Category>) -> Self {
        Self { search: search.into(), category }
    }

    pub fn matches(&self, agent: &Agent) -> bool {
        let matches_search = self.search.is_empty()
            || agent.name.to_lowercase().contains(&self.search.to_lowercase());
        let matches_category = self.category.map_or(true, |c| agent.category == c);
        matches_search && matches_category
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    /// Visual radius, never below [`MIN_NODE_SIZE`].
    pub size: f64,
    pub category: Category,
    pub balance: u64,
    pub status: Status,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    pub kind: ConnectionKind,
    pub strength: u8,
    pub width: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl GraphData {
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }
}

/// `max(MIN_NODE_SIZE, log2(balance) * NODE_SCALE)`; balances of 0 and 1
/// have a non-positive or undefined log and take the minimum directly.
pub fn node_size(balance: u64) -> f64 {
    if balance <= 1 {
        return MIN_NODE_SIZE;
    }
    ((balance as f64).log2() * NODE_SCALE).max(MIN_NODE_SIZE)
}

pub fn project_graph(agents: &[Agent], connections: &[Connection], filter: &GraphFilter) -> GraphData {
    let nodes: Vec<GraphNode> = agents
        .iter()
        .filter(|a| filter.matches(a))
        .map(|a| GraphNode {
            id: a.id.clone(),
            name: a.name.clone(),
            size: node_size(a.balance),
            category: a.category,
            balance: a.balance,
            status: a.status,
            color: balance_color(a.balance).to_string(),
        })
        .collect();

    let visible: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

    let links: Vec<GraphLink> = connections
        .iter()
        .filter(|c| visible.contains(c.source.as_str()) && visible.contains(c.target.as_str()))
        .map(|c| {
            let strength = c.effective_strength();
            GraphLink {
                source: c.source.clone(),
                target: c.target.clone(),
                kind: c.kind,
                strength,
                width: edge_width(strength),
            }
        })
        .collect();

    tracing::trace!(
        nodes = nodes.len(),
        links = links.len(),
        dropped_links = connections.len() - links.len(),
        "Projected agent graph"
    );

    GraphData { nodes, links }
}
