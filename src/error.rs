use thiserror::Error;

use crate::types::EntityKind;

/// Rejections reported by the trackers. A rejected operation never mutates state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("{kind} '{name}' not found")]
    NotFound { kind: EntityKind, name: String },

    #[error("{kind} '{name}' already exists")]
    AlreadyExists { kind: EntityKind, name: String },

    #[error("invalid status '{0}' (expected one of: done, in-progress, pending)")]
    InvalidStatus(String),

    #[error("product '{product}' is not in stock, cannot apply change {delta}")]
    UnknownProduct { product: String, delta: i64 },

    #[error("quantity of product '{product}' would overflow")]
    QuantityOverflow { product: String },

    #[error("wrong password")]
    InvalidCredentials,
}

impl TrackerError {
    pub(crate) fn not_found(kind: EntityKind, name: &str) -> Self {
        Self::NotFound {
            kind,
            name: name.to_string(),
        }
    }

    pub(crate) fn already_exists(kind: EntityKind, name: &str) -> Self {
        Self::AlreadyExists {
            kind,
            name: name.to_string(),
        }
    }
}
