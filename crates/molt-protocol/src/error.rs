use thiserror::Error;

/// Errors raised while interpreting domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("unknown {kind}: '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("invalid transaction amount {0}: must be positive")]
    InvalidAmount(u64),
}
