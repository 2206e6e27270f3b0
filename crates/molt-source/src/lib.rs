//! MoltNet Source - where agent snapshots come from
//!
//! A [`DataSource`] is either the generated fixture or the remote read API,
//! chosen by an explicit [`SourceConfig`]. [`SnapshotFeed`] layers the
//! last-known-good policy on top so callers never see a failed fetch.
//! The analytics and chat clients are independent read-only collaborators.

pub mod analytics;
pub mod chat;
pub mod error;
pub mod feed;
pub mod fixture;
pub mod remote;
pub mod source;

pub use analytics::{AnalyticsClient, AnalyticsConfig, PostSort};
pub use chat::{ChatConfig, ChatRelay, ChatSession};
pub use error::*;
pub use feed::{Snapshot, SnapshotFeed, SnapshotOrigin};
pub use fixture::FixtureSource;
pub use remote::{RemoteConfig, RemoteSource};
pub use source::{AgentSource, DataSource, SourceConfig, SourceFuture};
