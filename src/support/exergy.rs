//! Exergy accounting primitives.
//!
//! This module converts heat duties into exergy and expresses the results of
//! an exergy balance:
//!
//! - [`HeatFlow`]: direction of a heat duty across a unit boundary
//! - [`ThermalRole`] and [`ReferenceTemperatures`]: the reference temperature
//!   assigned to each kind of heat duty
//! - [`thermal_exergy`] and [`carnot_factor`]: the thermal exergy converter
//! - [`Efficiency`]: a second-law efficiency guaranteed to lie in `[0, 1]`
//!
//! # Example
//!
//! ```
//! use twine_exergy::support::exergy::{ReferenceTemperatures, ThermalRole};
//! use uom::si::{f64::Power, power::kilowatt};
//!
//! let temps = ReferenceTemperatures::default();
//! let removed = Power::new::<kilowatt>(-50.0);
//!
//! // 50 kW removed at 303.15 K against a 298.15 K ambient.
//! let ex_q = temps.exergy_of(ThermalRole::Cooler, removed);
//! assert!((ex_q.get::<kilowatt>() - 0.824_674).abs() < 1e-6);
//! ```

mod efficiency;
mod flow;
mod reference;

pub use efficiency::Efficiency;
pub use flow::HeatFlow;
pub use reference::{AMBIENT_KELVIN, ReferenceTemperatures, ThermalRole};

use uom::{
    ConstZero,
    si::{
        f64::{Power, ThermodynamicTemperature},
        thermodynamic_temperature::kelvin,
    },
};

/// Returns the Carnot-like exergy factor `1 - T0 / T_ref`.
#[must_use]
pub fn carnot_factor(t_ref: ThermodynamicTemperature, ambient: ThermodynamicTemperature) -> f64 {
    1.0 - ambient.get::<kelvin>() / t_ref.get::<kelvin>()
}

/// Returns the exergy carried by a heat duty exchanged at `t_ref`.
///
/// The sign of `duty` is ignored; callers track direction with [`HeatFlow`].
/// A zero or `NaN` duty yields exactly zero.
#[must_use]
pub fn thermal_exergy(
    duty: Power,
    t_ref: ThermodynamicTemperature,
    ambient: ThermodynamicTemperature,
) -> Power {
    if duty.is_nan() || duty == Power::ZERO {
        return Power::ZERO;
    }
    duty.abs() * carnot_factor(t_ref, ambient)
}
