//! MoltNet Dashboard - terminal front end for the agent network views
//!
//! Loads configuration, builds the data source, and renders leaderboard,
//! graph and stats views as text or JSON. Also serves the read API so a
//! remote-mode dashboard can be pointed at a local instance.

pub mod config;
pub mod render;
pub mod server;

pub use config::{ConfigError, DashboardConfig};
