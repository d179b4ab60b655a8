//! Exergy balance models for process flowsheets.
//!
//! This module provides [`twine_core::Model`] implementations that run a
//! complete second-law analysis of a plant. The computational core is in
//! the internal `core` module.
//!
//! Two adapters expose the same core:
//!
//! - [`PlantExergyBalance`] holds a simulator connection and takes the
//!   [`Flowsheet`] as input, for analyzing several topologies against one
//!   converged simulation.
//! - [`SnapshotExergyBalance`] holds a fixed [`Flowsheet`] and takes a
//!   [`SnapshotSource`] as input, for analyzing one plant across many
//!   exported operating points.
//!
//! # Example
//!
//! ```
//! use twine_core::Model;
//! use twine_exergy::{
//!     models::exergy::SnapshotExergyBalance,
//!     support::{
//!         flowsheet::Flowsheet,
//!         source::{PathTemplates, QuantityKind, SnapshotSource},
//!     },
//! };
//!
//! let flowsheet = Flowsheet::from_toml_str(r#"
//!     feeds = ["FEED"]
//!     products = ["PRODUCT"]
//!
//!     [[pumps]]
//!     name = "P-1"
//!     inlets = ["FEED"]
//!     outlets = ["PRODUCT"]
//! "#).unwrap();
//!
//! let paths = PathTemplates::default();
//! let mut snapshot = SnapshotSource::new();
//! snapshot.insert_quantity(&paths, QuantityKind::StreamExergy, "FEED", 100.0);
//! snapshot.insert_quantity(&paths, QuantityKind::StreamExergy, "PRODUCT", 95.0);
//! snapshot.insert_quantity(&paths, QuantityKind::ShaftPower, "P-1", 10.0);
//!
//! let report = SnapshotExergyBalance::new(flowsheet).call(&snapshot).unwrap();
//! let ledger = report.ledger();
//!
//! assert_eq!(ledger.get("pumps"), Some(15.0));
//! assert_eq!(ledger.get("plant_loss"), Some(15.0));
//! assert_eq!(ledger.get("balance_residual"), Some(0.0));
//! ```

mod core;

pub use self::core::{
    Arity, BalanceError, CategoryBreakdown, CategoryLoss, CategoryShare, ExergyReport, HeatTerm,
    Ledger, LookupIssue, LookupWarning, PlantBalance, PlantMetric, SkippedUnit, UnitError,
    UnitOutcome, UnitResult,
};

use twine_core::Model;

use crate::support::{
    flowsheet::Flowsheet,
    source::{SnapshotSource, ValueSource},
};

use self::core::analyze_plant;

/// Whole-plant exergy balance against a fixed value source.
///
/// The [`Flowsheet`] passed to [`Model::call`] names the units to analyze;
/// every quantity is read from the wrapped source.
#[derive(Debug, Clone)]
pub struct PlantExergyBalance<S> {
    source: S,
}

impl<S: ValueSource> PlantExergyBalance<S> {
    /// Creates a model reading from `source`.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Returns the wrapped source.
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: ValueSource> Model for PlantExergyBalance<S> {
    type Input = Flowsheet;
    type Output = ExergyReport;
    type Error = BalanceError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        analyze_plant(input, &self.source).inspect_err(log_failure)
    }
}

/// Whole-plant exergy balance of a fixed flowsheet.
///
/// Each call analyzes one [`SnapshotSource`] of exported simulator results.
#[derive(Debug, Clone)]
pub struct SnapshotExergyBalance {
    flowsheet: Flowsheet,
}

impl SnapshotExergyBalance {
    /// Creates a model for `flowsheet`.
    #[must_use]
    pub fn new(flowsheet: Flowsheet) -> Self {
        Self { flowsheet }
    }

    /// Returns the flowsheet analyzed on every call.
    #[must_use]
    pub fn flowsheet(&self) -> &Flowsheet {
        &self.flowsheet
    }
}

impl Model for SnapshotExergyBalance {
    type Input = SnapshotSource;
    type Output = ExergyReport;
    type Error = BalanceError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        analyze_plant(&self.flowsheet, input).inspect_err(log_failure)
    }
}

fn log_failure(error: &BalanceError) {
    tracing::error!(?error, "exergy balance failed, no report produced");
}
