//! Exergy balance of a process flowsheet.
//!
//! Stream exergies, shaft powers and heat duties are read from a
//! [`ValueSource`](crate::support::source::ValueSource) through a lookup
//! layer that never fails: a missing node reads as zero and is recorded as a
//! [`LookupWarning`]. Each equipment category then runs its own balance
//! equation per unit, accumulating non-negative losses, and a top-down plant
//! balance is computed from boundary streams, work and heat.

mod accessors;
mod analyzers;
mod error;
mod plant;
mod report;

#[cfg(test)]
mod test_support;

pub use accessors::{LookupIssue, LookupWarning};
pub use error::{Arity, BalanceError, UnitError};
pub use report::{
    CategoryBreakdown, CategoryLoss, CategoryShare, ExergyReport, HeatTerm, Ledger, PlantBalance,
    PlantMetric, SkippedUnit, UnitOutcome, UnitResult,
};

pub(crate) use plant::analyze_plant;

use accessors::QuantityReader;
use analyzers::{Context, analyze_category};
