//! Flowsheet topology supplied by the caller.
//!
//! A [`Flowsheet`] lists the plant boundary streams and, for each
//! [`EquipmentCategory`], the unit instances with their connected streams.
//! The exergy balance never discovers topology at runtime; it only reads the
//! quantities named here.
//!
//! Flowsheets are usually written in TOML:
//!
//! ```
//! use twine_exergy::support::flowsheet::{CompressorKind, EquipmentCategory, Flowsheet};
//!
//! let flowsheet = Flowsheet::from_toml_str(r#"
//!     feeds = ["FEED"]
//!     products = ["PRODUCT"]
//!
//!     [[pumps]]
//!     name = "P-1"
//!     inlets = ["FEED"]
//!     outlets = ["S1"]
//!
//!     [[compressors]]
//!     name = "K-1"
//!     inlets = ["S1"]
//!     outlets = ["PRODUCT"]
//!     kind = "with-duty"
//! "#).unwrap();
//!
//! assert_eq!(flowsheet.units(EquipmentCategory::Pump).len(), 1);
//! assert_eq!(flowsheet.compressors[0].kind, CompressorKind::WithDuty);
//! ```

use std::{fmt, fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uom::si::{
    f64::{Power, ThermodynamicTemperature},
    power::kilowatt,
    thermodynamic_temperature::kelvin,
};

use crate::support::{
    constraint::ConstraintError,
    exergy::{ReferenceTemperatures, ThermalRole},
    source::PathTemplates,
};

/// Default relative divergence between plant loss and the sum of category
/// losses above which a warning is logged.
pub const DEFAULT_DIVERGENCE_THRESHOLD: f64 = 0.10;

/// Equipment categories, each with its own balance equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EquipmentCategory {
    Pump,
    Compressor,
    Cooler,
    Mixer,
    Valve,
    Separator,
    Furnace,
    HeatExchanger,
    FlashTank,
    Column,
    Reactor,
}

impl EquipmentCategory {
    /// Every category, in analysis order.
    pub const ALL: [Self; 11] = [
        Self::Pump,
        Self::Compressor,
        Self::Cooler,
        Self::Mixer,
        Self::Valve,
        Self::Separator,
        Self::Furnace,
        Self::HeatExchanger,
        Self::FlashTank,
        Self::Column,
        Self::Reactor,
    ];

    /// Plural key under which the category is configured and reported.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Pump => "pumps",
            Self::Compressor => "compressors",
            Self::Cooler => "coolers",
            Self::Mixer => "mixers",
            Self::Valve => "valves",
            Self::Separator => "separators",
            Self::Furnace => "furnaces",
            Self::HeatExchanger => "heat_exchangers",
            Self::FlashTank => "flash_tanks",
            Self::Column => "columns",
            Self::Reactor => "reactors",
        }
    }
}

impl fmt::Display for EquipmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pump => "pump",
            Self::Compressor => "compressor",
            Self::Cooler => "cooler",
            Self::Mixer => "mixer",
            Self::Valve => "valve",
            Self::Separator => "separator",
            Self::Furnace => "furnace",
            Self::HeatExchanger => "heat exchanger",
            Self::FlashTank => "flash tank",
            Self::Column => "column",
            Self::Reactor => "reactor",
        };
        f.write_str(label)
    }
}

/// One equipment instance and the streams connected to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSpec {
    /// Block name in the simulator.
    pub name: String,

    /// Streams entering the unit.
    #[serde(default, alias = "inputs")]
    pub inlets: Vec<String>,

    /// Streams leaving the unit.
    #[serde(default, alias = "outputs")]
    pub outlets: Vec<String>,
}

impl UnitSpec {
    /// Creates a unit from its name and stream lists.
    pub fn new<I, O>(name: impl Into<String>, inlets: I, outlets: O) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            name: name.into(),
            inlets: inlets.into_iter().map(Into::into).collect(),
            outlets: outlets.into_iter().map(Into::into).collect(),
        }
    }
}

/// Whether a compressor reports a heat duty alongside its shaft power.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompressorKind {
    /// Shaft power only.
    #[default]
    Standard,
    /// Multistage compressor with intercooling, reporting a heat duty.
    WithDuty,
}

/// A compressor instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressorSpec {
    #[serde(flatten)]
    pub unit: UnitSpec,

    #[serde(default)]
    pub kind: CompressorKind,
}

impl CompressorSpec {
    /// A compressor without a heat term.
    #[must_use]
    pub fn standard(unit: UnitSpec) -> Self {
        Self {
            unit,
            kind: CompressorKind::Standard,
        }
    }

    /// A compressor whose heat duty enters the balance.
    #[must_use]
    pub fn with_duty(unit: UnitSpec) -> Self {
        Self {
            unit,
            kind: CompressorKind::WithDuty,
        }
    }
}

/// Optional reference temperature overrides, in kelvin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceTemperatureSettings {
    pub ambient: Option<f64>,
    pub cooler: Option<f64>,
    pub furnace: Option<f64>,
    pub flash: Option<f64>,
    pub reactor: Option<f64>,
    pub condenser: Option<f64>,
    pub reboiler: Option<f64>,
    pub compressor: Option<f64>,
}

impl ReferenceTemperatureSettings {
    fn role(&self, role: ThermalRole) -> Option<f64> {
        match role {
            ThermalRole::Cooler => self.cooler,
            ThermalRole::Furnace => self.furnace,
            ThermalRole::Flash => self.flash,
            ThermalRole::Reactor => self.reactor,
            ThermalRole::Condenser => self.condenser,
            ThermalRole::Reboiler => self.reboiler,
            ThermalRole::Compressor => self.compressor,
        }
    }

    /// Applies the overrides on top of the default reference temperatures.
    ///
    /// # Errors
    ///
    /// Returns [`FlowsheetError::InvalidReferenceTemperature`] if any override
    /// is not a strictly positive, finite temperature.
    pub fn resolve(&self) -> Result<ReferenceTemperatures, FlowsheetError> {
        let mut temps = ReferenceTemperatures::default();

        if let Some(value) = self.ambient {
            temps = temps
                .with_ambient(ThermodynamicTemperature::new::<kelvin>(value))
                .map_err(|source| FlowsheetError::InvalidReferenceTemperature {
                    role: "ambient",
                    value,
                    source,
                })?;
        }

        for role in ThermalRole::ALL {
            if let Some(value) = self.role(role) {
                temps = temps
                    .with_role(role, ThermodynamicTemperature::new::<kelvin>(value))
                    .map_err(|source| FlowsheetError::InvalidReferenceTemperature {
                        role: role.name(),
                        value,
                        source,
                    })?;
            }
        }

        Ok(temps)
    }
}

/// Errors raised while loading or validating a flowsheet.
#[derive(Debug, Error)]
pub enum FlowsheetError {
    /// The flowsheet file could not be read or written.
    #[error("flowsheet file error: {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The flowsheet is not valid TOML or does not match the schema.
    #[error("flowsheet parse error")]
    Parse(#[from] toml::de::Error),

    /// The flowsheet could not be serialized.
    #[error("flowsheet serialization error")]
    Serialize(#[from] toml::ser::Error),

    /// A reference temperature override is not a valid absolute temperature.
    #[error("invalid {role} reference temperature: {value} K")]
    InvalidReferenceTemperature {
        role: &'static str,
        value: f64,
        #[source]
        source: ConstraintError,
    },

    /// The divergence threshold is negative or not finite.
    #[error("invalid divergence threshold: {0}")]
    InvalidDivergenceThreshold(f64),

    /// The lookup default is not finite.
    #[error("invalid lookup default: {0} kW")]
    InvalidLookupDefault(f64),
}

/// Static topology and settings for one exergy analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flowsheet {
    /// Streams entering the plant.
    pub feeds: Vec<String>,
    /// Streams leaving the plant.
    pub products: Vec<String>,

    pub pumps: Vec<UnitSpec>,
    pub compressors: Vec<CompressorSpec>,
    pub coolers: Vec<UnitSpec>,
    pub mixers: Vec<UnitSpec>,
    pub valves: Vec<UnitSpec>,
    pub separators: Vec<UnitSpec>,
    pub furnaces: Vec<UnitSpec>,
    pub heat_exchangers: Vec<UnitSpec>,
    pub flash_tanks: Vec<UnitSpec>,
    pub columns: Vec<UnitSpec>,
    pub reactors: Vec<UnitSpec>,

    /// Relative divergence between plant loss and the sum of category losses
    /// above which a warning is logged.
    pub divergence_threshold: f64,

    /// Value in kW used for any quantity the source cannot provide.
    pub lookup_default: f64,

    pub reference_temperatures: ReferenceTemperatureSettings,
    pub paths: PathTemplates,
}

impl Default for Flowsheet {
    fn default() -> Self {
        Self {
            feeds: Vec::new(),
            products: Vec::new(),
            pumps: Vec::new(),
            compressors: Vec::new(),
            coolers: Vec::new(),
            mixers: Vec::new(),
            valves: Vec::new(),
            separators: Vec::new(),
            furnaces: Vec::new(),
            heat_exchangers: Vec::new(),
            flash_tanks: Vec::new(),
            columns: Vec::new(),
            reactors: Vec::new(),
            divergence_threshold: DEFAULT_DIVERGENCE_THRESHOLD,
            lookup_default: 0.0,
            reference_temperatures: ReferenceTemperatureSettings::default(),
            paths: PathTemplates::default(),
        }
    }
}

impl Flowsheet {
    /// Parses a flowsheet from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`FlowsheetError::Parse`] if the text is not a valid flowsheet.
    pub fn from_toml_str(text: &str) -> Result<Self, FlowsheetError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a flowsheet from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`FlowsheetError::Io`] if the file cannot be read, or
    /// [`FlowsheetError::Parse`] if its contents are not a valid flowsheet.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FlowsheetError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| FlowsheetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Serializes the flowsheet to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`FlowsheetError::Serialize`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, FlowsheetError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Resolves the reference temperatures for this flowsheet.
    ///
    /// # Errors
    ///
    /// Returns [`FlowsheetError::InvalidReferenceTemperature`] for an invalid override.
    pub fn reference_temperatures(&self) -> Result<ReferenceTemperatures, FlowsheetError> {
        self.reference_temperatures.resolve()
    }

    /// Returns the validated divergence threshold.
    ///
    /// # Errors
    ///
    /// Returns [`FlowsheetError::InvalidDivergenceThreshold`] if the threshold
    /// is negative or not finite.
    pub fn divergence_threshold(&self) -> Result<f64, FlowsheetError> {
        let threshold = self.divergence_threshold;
        if threshold.is_finite() && threshold >= 0.0 {
            Ok(threshold)
        } else {
            Err(FlowsheetError::InvalidDivergenceThreshold(threshold))
        }
    }

    /// Returns the validated lookup default.
    ///
    /// # Errors
    ///
    /// Returns [`FlowsheetError::InvalidLookupDefault`] if the value is not finite.
    pub fn lookup_default(&self) -> Result<Power, FlowsheetError> {
        if self.lookup_default.is_finite() {
            Ok(Power::new::<kilowatt>(self.lookup_default))
        } else {
            Err(FlowsheetError::InvalidLookupDefault(self.lookup_default))
        }
    }

    /// Returns the units configured for `category`, in configuration order.
    #[must_use]
    pub fn units(&self, category: EquipmentCategory) -> Vec<&UnitSpec> {
        let list = match category {
            EquipmentCategory::Compressor => {
                return self.compressors.iter().map(|c| &c.unit).collect();
            }
            EquipmentCategory::Pump => &self.pumps,
            EquipmentCategory::Cooler => &self.coolers,
            EquipmentCategory::Mixer => &self.mixers,
            EquipmentCategory::Valve => &self.valves,
            EquipmentCategory::Separator => &self.separators,
            EquipmentCategory::Furnace => &self.furnaces,
            EquipmentCategory::HeatExchanger => &self.heat_exchangers,
            EquipmentCategory::FlashTank => &self.flash_tanks,
            EquipmentCategory::Column => &self.columns,
            EquipmentCategory::Reactor => &self.reactors,
        };
        list.iter().collect()
    }

    /// Total number of configured unit instances.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        EquipmentCategory::ALL
            .iter()
            .map(|&category| self.units(category).len())
            .sum()
    }

    /// Returns `true` if the flowsheet has no units and no boundary streams.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty() && self.products.is_empty() && self.unit_count() == 0
    }
}
