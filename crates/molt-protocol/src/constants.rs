/// Symbol of the network's fungible token.
pub const TOKEN_SYMBOL: &str = "MOLT";

/// Avatar generator used for agents that have no uploaded avatar.
pub const AVATAR_BASE_URL: &str = "https://api.dicebear.com/9.x/bottts-neutral/svg?seed=";

/// Inclusive bounds of `Connection::strength`.
pub const MIN_CONNECTION_STRENGTH: u8 = 1;
pub const MAX_CONNECTION_STRENGTH: u8 = 10;

/// Build the default avatar URI for an agent name.
pub fn default_avatar(name: &str) -> String {
    format!("{AVATAR_BASE_URL}{name}")
}
