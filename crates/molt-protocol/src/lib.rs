//! MoltNet Protocol - Core domain types
//!
//! Shared vocabulary for the Moltbook agent network: agents, their token
//! history, and the connections between them. Field names on the wire follow
//! the read API's camelCase JSON.

pub mod constants;
pub mod error;
pub mod types;

pub use constants::*;
pub use error::*;
pub use types::*;
