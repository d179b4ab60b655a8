use uom::si::{
    f64::{Power, Ratio},
    power::watt,
    ratio::{percent, ratio},
};

use crate::support::constraint::{Constrained, UnitInterval};

/// A second-law efficiency in the closed interval `[0, 1]`.
///
/// An efficiency whose denominator is not strictly positive is reported as
/// zero instead of dividing. Values outside `[0, 1]` (a unit that appears to
/// create exergy, or one that destroys more than it receives) are clamped to
/// the nearest bound, so a reported efficiency is never negative, infinite,
/// or `NaN`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Efficiency(Constrained<Ratio, UnitInterval>);

impl Efficiency {
    /// The zero efficiency.
    #[must_use]
    pub fn zero() -> Self {
        Self(UnitInterval::zero())
    }

    /// Efficiency from a unit balance: `1 - loss / supplied`.
    ///
    /// ```
    /// use twine_exergy::support::exergy::Efficiency;
    /// use uom::si::{f64::Power, power::kilowatt};
    ///
    /// let kw = Power::new::<kilowatt>;
    ///
    /// let eta = Efficiency::from_balance(kw(15.0), kw(110.0));
    /// assert!((eta.percent() - 86.3636).abs() < 1e-4);
    ///
    /// let undefined = Efficiency::from_balance(kw(0.0), kw(0.0));
    /// assert_eq!(undefined.percent(), 0.0);
    /// ```
    #[must_use]
    pub fn from_balance(loss: Power, supplied: Power) -> Self {
        match Self::quotient(loss, supplied) {
            Some(fraction_lost) => Self::clamped(1.0 - fraction_lost),
            None => Self::zero(),
        }
    }

    /// Efficiency as a plain ratio: `recovered / supplied`.
    #[must_use]
    pub fn from_ratio(recovered: Power, supplied: Power) -> Self {
        match Self::quotient(recovered, supplied) {
            Some(fraction) => Self::clamped(fraction),
            None => Self::zero(),
        }
    }

    /// Returns the efficiency as a dimensionless ratio.
    #[must_use]
    pub fn as_ratio(&self) -> Ratio {
        self.0.into_inner()
    }

    /// Returns the efficiency in percent.
    #[must_use]
    pub fn percent(&self) -> f64 {
        self.as_ratio().get::<percent>()
    }

    fn quotient(numerator: Power, denominator: Power) -> Option<f64> {
        let denominator = denominator.get::<watt>();
        if denominator.is_nan() || denominator <= 0.0 {
            return None;
        }
        Some(numerator.get::<watt>() / denominator)
    }

    fn clamped(value: f64) -> Self {
        if !value.is_finite() {
            return Self::zero();
        }
        UnitInterval::new(Ratio::new::<ratio>(value.clamp(0.0, 1.0)))
            .map_or_else(|_| Self::zero(), Self)
    }
}

impl Default for Efficiency {
    fn default() -> Self {
        Self::zero()
    }
}
