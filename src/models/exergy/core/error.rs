use std::fmt;

use thiserror::Error;

use crate::support::flowsheet::FlowsheetError;

/// Number of streams a unit expects on one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    One,
    AtLeastOne,
}

impl Arity {
    pub(crate) fn accepts(self, count: usize) -> bool {
        match self {
            Self::One => count == 1,
            Self::AtLeastOne => count >= 1,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => f.write_str("exactly one"),
            Self::AtLeastOne => f.write_str("at least one"),
        }
    }
}

/// Reasons a single unit is left out of its category total.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    /// The unit has an unexpected number of inlet streams.
    #[error("expected {expected} inlet stream, found {found}")]
    InletCount { expected: Arity, found: usize },

    /// The unit has an unexpected number of outlet streams.
    #[error("expected {expected} outlet stream, found {found}")]
    OutletCount { expected: Arity, found: usize },

    /// The balance produced a non-finite value.
    #[error("non-finite {quantity} in exergy balance")]
    NonFinite { quantity: &'static str },
}

/// Errors that abort a whole-plant analysis.
///
/// A run that fails with one of these produces no report.
#[derive(Debug, Error)]
pub enum BalanceError {
    /// The flowsheet settings are invalid.
    #[error("invalid flowsheet")]
    Flowsheet(#[from] FlowsheetError),

    /// The flowsheet has no units and no boundary streams.
    #[error("flowsheet is empty")]
    EmptyFlowsheet,

    /// A plant-wide total is not finite.
    #[error("plant {metric} is not finite")]
    NonFinite { metric: &'static str },
}
