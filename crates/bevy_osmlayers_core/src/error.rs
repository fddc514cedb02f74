//! Registry error type.

use thiserror::Error;

use crate::id::LayerId;

/// Why a proposed order is not a permutation of the current one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderViolation {
    #[error("expected {expected} ids, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("{0} appears more than once")]
    Duplicate(LayerId),

    #[error("{0} is not a registered layer")]
    Unknown(LayerId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// `reorder` was given something other than a permutation of the current order.
    #[error("Invalid layer order: {reason}")]
    InvalidOrder {
        expected: Vec<LayerId>,
        actual: Vec<LayerId>,
        reason: OrderViolation,
    },
}
