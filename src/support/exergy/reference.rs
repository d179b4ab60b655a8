use std::fmt;

use uom::si::{
    f64::{Power, ThermodynamicTemperature},
    thermodynamic_temperature::kelvin,
};

use crate::support::constraint::{Constrained, ConstraintError, StrictlyPositive};

use super::thermal_exergy;

/// Ambient temperature defining the dead state, in kelvin.
pub const AMBIENT_KELVIN: f64 = 298.15;

/// The kind of heat duty being converted to exergy.
///
/// Each role is exchanged at its own fixed reference temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThermalRole {
    Cooler,
    Furnace,
    Flash,
    Reactor,
    Condenser,
    Reboiler,
    Compressor,
}

impl ThermalRole {
    /// Every role, in a fixed order.
    pub const ALL: [Self; 7] = [
        Self::Cooler,
        Self::Furnace,
        Self::Flash,
        Self::Reactor,
        Self::Condenser,
        Self::Reboiler,
        Self::Compressor,
    ];

    /// Default reference temperature for this role, in kelvin.
    #[must_use]
    pub const fn default_kelvin(self) -> f64 {
        match self {
            Self::Cooler | Self::Reactor => 303.15,
            Self::Furnace => 3273.15,
            Self::Flash => 313.15,
            Self::Condenser => 333.15,
            Self::Reboiler => 570.15,
            Self::Compressor => 350.15,
        }
    }

    /// Lowercase identifier used in configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cooler => "cooler",
            Self::Furnace => "furnace",
            Self::Flash => "flash",
            Self::Reactor => "reactor",
            Self::Condenser => "condenser",
            Self::Reboiler => "reboiler",
            Self::Compressor => "compressor",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Cooler => 0,
            Self::Furnace => 1,
            Self::Flash => 2,
            Self::Reactor => 3,
            Self::Condenser => 4,
            Self::Reboiler => 5,
            Self::Compressor => 6,
        }
    }
}

impl fmt::Display for ThermalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ambient and per-role reference temperatures for one analysis run.
///
/// All temperatures are strictly positive absolute temperatures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceTemperatures {
    ambient: ThermodynamicTemperature,
    roles: [ThermodynamicTemperature; 7],
}

impl Default for ReferenceTemperatures {
    fn default() -> Self {
        Self {
            ambient: ThermodynamicTemperature::new::<kelvin>(AMBIENT_KELVIN),
            roles: ThermalRole::ALL
                .map(|role| ThermodynamicTemperature::new::<kelvin>(role.default_kelvin())),
        }
    }
}

impl ReferenceTemperatures {
    /// Returns a copy with a different ambient temperature.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] if the temperature is not strictly
    /// positive and finite.
    pub fn with_ambient(
        mut self,
        ambient: ThermodynamicTemperature,
    ) -> Result<Self, ConstraintError> {
        self.ambient = absolute(ambient)?;
        Ok(self)
    }

    /// Returns a copy with a different reference temperature for `role`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] if the temperature is not strictly
    /// positive and finite.
    pub fn with_role(
        mut self,
        role: ThermalRole,
        t_ref: ThermodynamicTemperature,
    ) -> Result<Self, ConstraintError> {
        self.roles[role.index()] = absolute(t_ref)?;
        Ok(self)
    }

    /// Ambient (dead state) temperature.
    #[must_use]
    pub fn ambient(&self) -> ThermodynamicTemperature {
        self.ambient
    }

    /// Reference temperature at which heat for `role` is exchanged.
    #[must_use]
    pub fn of(&self, role: ThermalRole) -> ThermodynamicTemperature {
        self.roles[role.index()]
    }

    /// Exergy content of `duty` exchanged in the given role.
    #[must_use]
    pub fn exergy_of(&self, role: ThermalRole, duty: Power) -> Power {
        thermal_exergy(duty, self.of(role), self.ambient)
    }
}

/// Checks that `t` is a usable absolute temperature.
fn absolute(t: ThermodynamicTemperature) -> Result<ThermodynamicTemperature, ConstraintError> {
    let value = t.get::<kelvin>();
    if value.is_infinite() {
        return Err(ConstraintError::NotFinite);
    }
    let value: Constrained<f64, StrictlyPositive> = StrictlyPositive::new(value)?;
    Ok(ThermodynamicTemperature::new::<kelvin>(value.into_inner()))
}
