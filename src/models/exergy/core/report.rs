//! Results of an exergy analysis.

use serde::{Serialize, Serializer, ser::SerializeMap};
use uom::{
    ConstZero,
    si::{
        f64::{Power, Ratio},
        power::{kilowatt, watt},
        ratio::ratio,
    },
};

use crate::support::{
    constraint::{Constrained, NonNegative},
    exergy::{Efficiency, HeatFlow, ThermalRole},
    flowsheet::EquipmentCategory,
};

use super::{LookupWarning, UnitError};

/// A heat duty and its exergy content within one unit balance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatTerm {
    /// Role that fixes the reference temperature.
    pub role: ThermalRole,
    /// Direction and magnitude of the duty.
    pub flow: HeatFlow,
    /// Exergy carried by the duty.
    pub exergy: Power,
}

/// Balance of one unit instance.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitResult {
    pub name: String,
    pub category: EquipmentCategory,

    /// Total exergy of the inlet streams.
    pub exergy_in: Power,

    /// Total exergy of the outlet streams.
    pub exergy_out: Power,

    /// Shaft power supplied, zero for units without a shaft.
    pub work: Power,

    /// Heat terms in the balance, empty for adiabatic units.
    pub heat: Vec<HeatTerm>,

    /// Exergy destroyed, as computed.
    ///
    /// May be negative when stream data suggest the unit gained exergy.
    pub loss: Power,

    pub efficiency: Efficiency,
}

impl UnitResult {
    /// Loss as it counts toward the category total.
    #[must_use]
    pub fn counted_loss(&self) -> Constrained<Power, NonNegative> {
        NonNegative::clamp(self.loss)
    }
}

/// A unit left out of its category total, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedUnit {
    pub name: String,
    pub category: EquipmentCategory,
    pub reason: UnitError,
}

/// Outcome of analyzing one unit instance.
pub type UnitOutcome = Result<UnitResult, SkippedUnit>;

/// All units of one category and their accumulated loss.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryLoss {
    pub category: EquipmentCategory,
    pub units: Vec<UnitResult>,
    pub skipped: Vec<SkippedUnit>,
    total: Constrained<Power, NonNegative>,
}

impl CategoryLoss {
    pub(crate) fn new(category: EquipmentCategory) -> Self {
        Self {
            category,
            units: Vec::new(),
            skipped: Vec::new(),
            total: NonNegative::zero(),
        }
    }

    /// Adds one unit outcome, accumulating only non-negative loss.
    pub(crate) fn record(&mut self, outcome: UnitOutcome) {
        match outcome {
            Ok(unit) => {
                self.total = self.total + unit.counted_loss();
                self.units.push(unit);
            }
            Err(skipped) => self.skipped.push(skipped),
        }
    }

    /// Sum of `max(loss, 0)` over the analyzed units.
    #[must_use]
    pub fn total(&self) -> Power {
        self.total.into_inner()
    }
}

/// One category's share of the summed category losses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryShare {
    pub category: EquipmentCategory,
    pub loss: Power,
    pub share: Ratio,
}

/// Bottom-up apportionment of exergy destruction across categories.
///
/// The total here is not expected to equal the plant loss: category losses
/// are clamped per unit, while the plant loss comes from boundary flows.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBreakdown {
    pub shares: Vec<CategoryShare>,
    pub total: Power,
}

impl CategoryBreakdown {
    pub(crate) fn new(categories: &[CategoryLoss]) -> Self {
        let total = categories
            .iter()
            .map(|category| category.total)
            .sum::<Constrained<Power, NonNegative>>()
            .into_inner();

        let shares = categories
            .iter()
            .map(|category| {
                let loss = category.total();
                let share = if total > Power::ZERO {
                    Ratio::new::<ratio>(loss.get::<watt>() / total.get::<watt>())
                } else {
                    Ratio::new::<ratio>(0.0)
                };
                CategoryShare {
                    category: category.category,
                    loss,
                    share,
                }
            })
            .collect();

        Self { shares, total }
    }
}

/// Plant-wide metrics of an exergy analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlantMetric {
    WorkExergyIn,
    HeatExergyIn,
    HeatExergyOut,
    TotalExergyIn,
    TotalExergyOut,
    PlantLoss,
    TraditionalEfficiency,
    CompleteEfficiency,
    BalanceResidual,
}

impl PlantMetric {
    /// Every metric, in reporting order.
    pub const ALL: [Self; 9] = [
        Self::WorkExergyIn,
        Self::HeatExergyIn,
        Self::HeatExergyOut,
        Self::TotalExergyIn,
        Self::TotalExergyOut,
        Self::PlantLoss,
        Self::TraditionalEfficiency,
        Self::CompleteEfficiency,
        Self::BalanceResidual,
    ];

    /// Ledger key for this metric.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::WorkExergyIn => "work_exergy_in",
            Self::HeatExergyIn => "heat_exergy_in",
            Self::HeatExergyOut => "heat_exergy_out",
            Self::TotalExergyIn => "total_exergy_in",
            Self::TotalExergyOut => "total_exergy_out",
            Self::PlantLoss => "plant_loss",
            Self::TraditionalEfficiency => "traditional_efficiency",
            Self::CompleteEfficiency => "complete_efficiency",
            Self::BalanceResidual => "balance_residual",
        }
    }
}

/// Whole-plant exergy balance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlantBalance {
    /// Exergy of the feed streams.
    pub feed_exergy: Power,
    /// Exergy of the product streams.
    pub product_exergy: Power,
    /// Shaft work supplied to pumps and compressors.
    pub work_exergy_in: Power,
    /// Exergy of heat supplied to the plant.
    pub heat_exergy_in: Power,
    /// Exergy of heat removed from the plant.
    pub heat_exergy_out: Power,
    /// Feeds plus work plus heat supplied.
    pub total_exergy_in: Power,
    /// Products plus heat removed.
    pub total_exergy_out: Power,
    /// Exergy destroyed across the plant boundary.
    pub plant_loss: Power,
    /// Products over feeds, ignoring work and heat.
    pub traditional_efficiency: Efficiency,
    /// Total output over total input.
    pub complete_efficiency: Efficiency,
    /// `total_exergy_in - total_exergy_out - plant_loss`, zero when consistent.
    pub balance_residual: Power,
}

impl PlantBalance {
    pub(crate) fn new(
        feed_exergy: Power,
        product_exergy: Power,
        work_exergy_in: Power,
        heat_exergy_in: Power,
        heat_exergy_out: Power,
    ) -> Self {
        let total_exergy_in = feed_exergy + work_exergy_in + heat_exergy_in;
        let total_exergy_out = product_exergy + heat_exergy_out;
        let plant_loss = total_exergy_in - total_exergy_out;

        Self {
            feed_exergy,
            product_exergy,
            work_exergy_in,
            heat_exergy_in,
            heat_exergy_out,
            total_exergy_in,
            total_exergy_out,
            plant_loss,
            traditional_efficiency: Efficiency::from_ratio(product_exergy, feed_exergy),
            complete_efficiency: Efficiency::from_ratio(total_exergy_out, total_exergy_in),
            balance_residual: total_exergy_in - total_exergy_out - plant_loss,
        }
    }

    /// Value of `metric` in ledger units: kW, or percent for efficiencies.
    #[must_use]
    pub fn metric(&self, metric: PlantMetric) -> f64 {
        match metric {
            PlantMetric::WorkExergyIn => self.work_exergy_in.get::<kilowatt>(),
            PlantMetric::HeatExergyIn => self.heat_exergy_in.get::<kilowatt>(),
            PlantMetric::HeatExergyOut => self.heat_exergy_out.get::<kilowatt>(),
            PlantMetric::TotalExergyIn => self.total_exergy_in.get::<kilowatt>(),
            PlantMetric::TotalExergyOut => self.total_exergy_out.get::<kilowatt>(),
            PlantMetric::PlantLoss => self.plant_loss.get::<kilowatt>(),
            PlantMetric::TraditionalEfficiency => self.traditional_efficiency.percent(),
            PlantMetric::CompleteEfficiency => self.complete_efficiency.percent(),
            PlantMetric::BalanceResidual => self.balance_residual.get::<kilowatt>(),
        }
    }

    /// Name of the first plant total that is not finite, if any.
    pub(crate) fn non_finite_metric(&self) -> Option<&'static str> {
        [
            ("feed_exergy", self.feed_exergy),
            ("product_exergy", self.product_exergy),
            (PlantMetric::WorkExergyIn.key(), self.work_exergy_in),
            (PlantMetric::HeatExergyIn.key(), self.heat_exergy_in),
            (PlantMetric::HeatExergyOut.key(), self.heat_exergy_out),
            (PlantMetric::TotalExergyIn.key(), self.total_exergy_in),
            (PlantMetric::TotalExergyOut.key(), self.total_exergy_out),
            (PlantMetric::PlantLoss.key(), self.plant_loss),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite())
        .map(|(metric, _)| metric)
    }
}

/// Flat view of a report: category totals and plant metrics by key.
///
/// Category totals and energy metrics are in kW, efficiencies in percent.
/// Serializes as a map in reporting order.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    categories: [f64; 11],
    metrics: [f64; 9],
}

impl Ledger {
    /// Total loss of `category`, in kW.
    #[must_use]
    pub fn category(&self, category: EquipmentCategory) -> f64 {
        EquipmentCategory::ALL
            .iter()
            .position(|&c| c == category)
            .map_or(0.0, |index| self.categories[index])
    }

    /// Value of a plant metric.
    #[must_use]
    pub fn metric(&self, metric: PlantMetric) -> f64 {
        PlantMetric::ALL
            .iter()
            .position(|&m| m == metric)
            .map_or(0.0, |index| self.metrics[index])
    }

    /// Looks up an entry by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<f64> {
        self.iter().find(|(k, _)| *k == key).map(|(_, value)| value)
    }

    /// Iterates over `(key, value)` pairs in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        let categories = EquipmentCategory::ALL
            .into_iter()
            .zip(self.categories)
            .map(|(category, value)| (category.key(), value));
        let metrics = PlantMetric::ALL
            .into_iter()
            .zip(self.metrics)
            .map(|(metric, value)| (metric.key(), value));
        categories.chain(metrics)
    }
}

impl Serialize for Ledger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len() + self.metrics.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, &value)?;
        }
        map.end()
    }
}

/// Output of a whole-plant exergy analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct ExergyReport {
    /// Per-category results, in analysis order.
    pub categories: Vec<CategoryLoss>,
    pub breakdown: CategoryBreakdown,
    pub plant: PlantBalance,

    /// Plant loss minus the summed category losses.
    ///
    /// Reported as a diagnostic and never reconciled.
    pub divergence: Power,

    /// Whether `|divergence|` exceeds the flowsheet's divergence threshold
    /// as a fraction of `|plant_loss|`.
    pub divergence_flagged: bool,

    /// Lookups that fell back to the default value.
    pub warnings: Vec<LookupWarning>,
}

impl ExergyReport {
    /// Results for one category.
    #[must_use]
    pub fn category(&self, category: EquipmentCategory) -> Option<&CategoryLoss> {
        self.categories.iter().find(|c| c.category == category)
    }

    /// Every unit skipped during the run.
    pub fn skipped_units(&self) -> impl Iterator<Item = &SkippedUnit> {
        self.categories.iter().flat_map(|c| c.skipped.iter())
    }

    /// Flattens the report into a [`Ledger`].
    #[must_use]
    pub fn ledger(&self) -> Ledger {
        Ledger {
            categories: EquipmentCategory::ALL.map(|category| {
                self.category(category)
                    .map_or(0.0, |c| c.total().get::<kilowatt>())
            }),
            metrics: PlantMetric::ALL.map(|metric| self.plant.metric(metric)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::ratio::percent;

    fn kw(value: f64) -> Power {
        Power::new::<kilowatt>(value)
    }

    fn unit(name: &str, loss: f64) -> UnitResult {
        UnitResult {
            name: name.into(),
            category: EquipmentCategory::Valve,
            exergy_in: kw(100.0),
            exergy_out: kw(100.0 - loss),
            work: Power::ZERO,
            heat: Vec::new(),
            loss: kw(loss),
            efficiency: Efficiency::from_balance(kw(loss), kw(100.0)),
        }
    }

    #[test]
    fn category_total_ignores_apparent_gains() {
        let mut valves = CategoryLoss::new(EquipmentCategory::Valve);
        valves.record(Ok(unit("VALVE-1", 4.0)));
        valves.record(Ok(unit("VALVE-2", -3.0)));
        valves.record(Err(SkippedUnit {
            name: "VALVE-3".into(),
            category: EquipmentCategory::Valve,
            reason: UnitError::NonFinite { quantity: "loss" },
        }));

        assert_relative_eq!(valves.total().get::<kilowatt>(), 4.0);
        assert_eq!(valves.units.len(), 2);
        assert_eq!(valves.skipped.len(), 1);
    }

    #[test]
    fn breakdown_shares_sum_to_one() {
        let mut valves = CategoryLoss::new(EquipmentCategory::Valve);
        valves.record(Ok(unit("VALVE-1", 30.0)));
        let mut mixers = CategoryLoss::new(EquipmentCategory::Mixer);
        mixers.record(Ok(unit("MIX-1", 10.0)));

        let breakdown = CategoryBreakdown::new(&[valves, mixers]);
        assert_relative_eq!(breakdown.total.get::<kilowatt>(), 40.0);
        assert_relative_eq!(breakdown.shares[0].share.get::<percent>(), 75.0);
        assert_relative_eq!(breakdown.shares[1].share.get::<percent>(), 25.0);
    }

    #[test]
    fn breakdown_of_lossless_plant_is_zero() {
        let breakdown = CategoryBreakdown::new(&[CategoryLoss::new(EquipmentCategory::Pump)]);
        assert_relative_eq!(breakdown.shares[0].share.get::<ratio>(), 0.0);
    }

    #[test]
    fn plant_balance_residual_is_exactly_zero() {
        let samples = [0.0, 1.0e-9, 0.1, 123.456, 98_765.4321, -17.3];
        for feed in samples {
            for product in samples {
                for extra in samples {
                    let plant = PlantBalance::new(
                        kw(feed),
                        kw(product),
                        kw(extra),
                        kw(extra * 0.3),
                        kw(extra * 0.7),
                    );
                    assert_eq!(plant.balance_residual.get::<watt>(), 0.0);
                }
            }
        }
    }

    #[test]
    fn plant_efficiencies() {
        let plant = PlantBalance::new(kw(1000.0), kw(800.0), kw(50.0), kw(150.0), kw(20.0));

        assert_relative_eq!(plant.total_exergy_in.get::<kilowatt>(), 1200.0);
        assert_relative_eq!(plant.total_exergy_out.get::<kilowatt>(), 820.0);
        assert_relative_eq!(plant.plant_loss.get::<kilowatt>(), 380.0);
        assert_relative_eq!(plant.traditional_efficiency.percent(), 80.0, epsilon = 1e-9);
        assert_relative_eq!(
            plant.complete_efficiency.percent(),
            820.0 / 1200.0 * 100.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn plant_without_feeds_reports_zero_efficiency() {
        let plant = PlantBalance::new(Power::ZERO, kw(10.0), Power::ZERO, Power::ZERO, Power::ZERO);
        assert_relative_eq!(plant.traditional_efficiency.percent(), 0.0);
        assert_relative_eq!(plant.complete_efficiency.percent(), 0.0);
    }

    #[test]
    fn flags_non_finite_totals() {
        let plant = PlantBalance::new(kw(f64::MAX), kw(0.0), kw(f64::MAX), kw(0.0), kw(0.0));
        assert_eq!(plant.non_finite_metric(), Some("feed_exergy"));
    }
}
