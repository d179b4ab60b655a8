use std::cmp::Ordering;

use crate::support::constraint::{Constrained, ConstraintError, StrictlyPositive};
use uom::{ConstZero, si::f64::Power};

/// Direction of a heat duty across a unit boundary.
///
/// Simulators report duties with a sign: positive when heat is supplied to
/// the unit and negative when it is removed. This enum makes the direction
/// explicit and keeps the magnitude strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeatFlow {
    /// Heat supplied to the unit (an exergy input).
    In(Constrained<Power, StrictlyPositive>),
    /// Heat removed from the unit (an exergy output).
    Out(Constrained<Power, StrictlyPositive>),
    /// No heat exchanged.
    None,
}

impl HeatFlow {
    /// Creates a [`HeatFlow::In`] for heat supplied to the unit.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] if `heat_rate` is not strictly positive.
    pub fn supplied(heat_rate: Power) -> Result<Self, ConstraintError> {
        Ok(Self::In(Constrained::new(heat_rate)?))
    }

    /// Creates a [`HeatFlow::Out`] for heat removed from the unit.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] if `heat_rate` is not strictly positive.
    pub fn removed(heat_rate: Power) -> Result<Self, ConstraintError> {
        Ok(Self::Out(Constrained::new(heat_rate)?))
    }

    /// Classifies a signed duty using the simulator convention.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError::NotANumber`] if the duty is `NaN`.
    pub fn from_signed(duty: Power) -> Result<Self, ConstraintError> {
        match duty.partial_cmp(&Power::ZERO) {
            Some(Ordering::Greater) => Self::supplied(duty),
            Some(Ordering::Less) => Self::removed(-duty),
            Some(Ordering::Equal) => Ok(Self::None),
            None => Err(ConstraintError::NotANumber),
        }
    }

    /// Returns the signed duty, positive when heat is supplied.
    #[must_use]
    pub fn signed(&self) -> Power {
        match self {
            Self::In(heat_rate) => heat_rate.into_inner(),
            Self::Out(heat_rate) => -heat_rate.into_inner(),
            Self::None => Power::ZERO,
        }
    }

    /// Returns the magnitude of the duty.
    #[must_use]
    pub fn magnitude(&self) -> Power {
        match self {
            Self::In(heat_rate) | Self::Out(heat_rate) => heat_rate.into_inner(),
            Self::None => Power::ZERO,
        }
    }

    /// Returns `true` for heat supplied to the unit.
    #[must_use]
    pub fn is_supplied(&self) -> bool {
        matches!(self, Self::In(_))
    }

    /// Returns `true` for heat removed from the unit.
    #[must_use]
    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Out(_))
    }
}
