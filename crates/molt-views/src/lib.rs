//! MoltNet Views - pure projections of an agent snapshot
//!
//! Every function here takes its complete input as arguments and returns a
//! freshly built value, so views can be recomputed on every keystroke.

pub mod derive;
pub mod graph;
pub mod leaderboard;
pub mod ordering;
pub mod stats;

pub use derive::*;
pub use graph::{project_graph, GraphData, GraphFilter, GraphLink, GraphNode};
pub use leaderboard::{build_leaderboard, build_leaderboard_with, LeaderboardEntry, LEADERBOARD_SIZE};
pub use ordering::{sort_agents, top_ranked, SortKey};
pub use stats::NetworkStats;
