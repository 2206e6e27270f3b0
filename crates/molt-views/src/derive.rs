use molt_protocol::{Category, ConnectionKind, Status};
use serde::{Deserialize, Serialize};

pub const WHALE_THRESHOLD: u64 = 30_000;
pub const HOLDER_THRESHOLD: u64 = 10_000;
pub const TRADER_THRESHOLD: u64 = 3_000;

/// Balance band of an agent. Variants are declared lowest first so the
/// derived `Ord` follows the bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceTier {
    Newcomer,
    Trader,
    Holder,
    Whale,
}

impl BalanceTier {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Whale => "🐋 Whale",
            Self::Holder => "💎 Holder",
            Self::Trader => "📊 Trader",
            Self::Newcomer => "🌱 Newcomer",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Whale => "hsl(155, 70%, 50%)",
            Self::Holder => "hsl(185, 80%, 55%)",
            Self::Trader => "hsl(38, 90%, 55%)",
            Self::Newcomer => "hsl(0, 72%, 55%)",
        }
    }
}

impl std::fmt::Display for BalanceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Whale => "whale",
            Self::Holder => "holder",
            Self::Trader => "trader",
            Self::Newcomer => "newcomer",
        };
        write!(f, "{s}")
    }
}

/// Lower bound of each band is inclusive.
pub fn tier_of(balance: u64) -> BalanceTier {
    match balance {
        WHALE_THRESHOLD.. => BalanceTier::Whale,
        HOLDER_THRESHOLD.. => BalanceTier::Holder,
        TRADER_THRESHOLD.. => BalanceTier::Trader,
        _ => BalanceTier::Newcomer,
    }
}

pub fn balance_color(balance: u64) -> &'static str {
    tier_of(balance).color()
}

pub fn category_color(category: Category) -> &'static str {
    match category {
        Category::Researcher => "hsl(185, 80%, 55%)",
        Category::Creator    => "hsl(270, 70%, 60%)",
        Category::Trader     => "hsl(38, 90%, 55%)",
        Category::Validator  => "hsl(155, 70%, 50%)",
        Category::Explorer   => "hsl(320, 70%, 55%)",
    }
}

pub fn connection_color(kind: ConnectionKind) -> &'static str {
    match kind {
        ConnectionKind::Collaboration => "hsl(185, 80%, 55%)",
        ConnectionKind::Learning      => "hsl(270, 70%, 60%)",
        ConnectionKind::Trade         => "hsl(38, 90%, 55%)",
        ConnectionKind::Mentorship    => "hsl(155, 70%, 50%)",
    }
}

pub fn status_color(status: Status) -> &'static str {
    match status {
        Status::Active  => "#22c55e",
        Status::Idle    => "#eab308",
        Status::Offline => "#6b7280",
    }
}

pub fn category_label(category: Category) -> &'static str {
    match category {
        Category::Researcher => "Investigador",
        Category::Creator    => "Creador",
        Category::Trader     => "Trader",
        Category::Validator  => "Validador",
        Category::Explorer   => "Explorador",
    }
}

pub fn connection_label(kind: ConnectionKind) -> &'static str {
    match kind {
        ConnectionKind::Collaboration => "Colaboración",
        ConnectionKind::Learning      => "Aprendizaje",
        ConnectionKind::Trade         => "Intercambio",
        ConnectionKind::Mentorship    => "Mentoría",
    }
}

/// Render `n` with a `K` suffix from 1000 up, one decimal, rounding half up.
/// Exact halves always round up (1150 is "1.2K"), where float formatting
/// would give "1.1K" for halves that are inexact in binary.
pub fn format_compact(n: u64) -> String {
    if n < 1000 {
        return n.to_string();
    }
    let tenths = (n as u128 + 50) / 100;
    format!("{}.{}K", tenths / 10, tenths % 10)
}

/// Like [`format_compact`], switching to an `M` suffix from one million up.
/// Used for network-wide counts.
pub fn format_count(n: u64) -> String {
    if n < 1_000_000 {
        return format_compact(n);
    }
    let tenths = (n as u128 + 50_000) / 100_000;
    format!("{}.{}M", tenths / 10, tenths % 10)
}

/// Stroke width for an edge of the given strength.
pub fn edge_width(strength: u8) -> f64 {
    (strength as f64 / 5.0).max(0.5)
}
