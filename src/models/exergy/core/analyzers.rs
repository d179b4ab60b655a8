//! Per-category unit balances.
//!
//! Each category has its own balance equation, implemented in one of the
//! submodules. [`analyze_category`] runs the equation over every configured
//! instance, recording failures per unit without aborting the category.

mod mixing;
mod thermal;
mod work;

use uom::si::{f64::Power, power::kilowatt};

use crate::support::{
    exergy::{Efficiency, HeatFlow, ReferenceTemperatures, ThermalRole},
    flowsheet::{CompressorKind, EquipmentCategory, Flowsheet, UnitSpec},
    source::ValueSource,
};

use super::{
    Arity, CategoryLoss, HeatTerm, QuantityReader, SkippedUnit, UnitError, UnitOutcome, UnitResult,
};

/// Shared inputs for one analysis run.
pub(crate) struct Context<'r, 'a, S: ?Sized> {
    pub(crate) reader: &'r mut QuantityReader<'a, S>,
    pub(crate) temps: &'r ReferenceTemperatures,
}

impl<S: ValueSource + ?Sized> Context<'_, '_, S> {
    /// Converts a signed duty to a heat term for `role`.
    fn heat_term(&self, role: ThermalRole, duty: Power) -> Result<HeatTerm, UnitError> {
        let flow = HeatFlow::from_signed(duty).map_err(|_| UnitError::NonFinite {
            quantity: "heat duty",
        })?;
        Ok(HeatTerm {
            role,
            flow,
            exergy: self.temps.exergy_of(role, flow.magnitude()),
        })
    }
}

/// Outcome of one balance equation, before it is tied to a unit name.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Balance {
    pub(super) exergy_in: Power,
    pub(super) exergy_out: Power,
    pub(super) work: Power,
    pub(super) heat: Vec<HeatTerm>,
    pub(super) loss: Power,
    pub(super) efficiency: Efficiency,
}

impl Balance {
    /// Balance of a unit with no work or heat term.
    fn adiabatic(exergy_in: Power, exergy_out: Power) -> Self {
        let loss = exergy_in - exergy_out;
        Self {
            exergy_in,
            exergy_out,
            work: Power::new::<kilowatt>(0.0),
            heat: Vec::new(),
            loss,
            efficiency: Efficiency::from_balance(loss, exergy_in),
        }
    }

    fn check_finite(&self) -> Result<(), UnitError> {
        let values = [
            ("inlet exergy", self.exergy_in),
            ("outlet exergy", self.exergy_out),
            ("work", self.work),
            ("loss", self.loss),
        ];
        let heat = self.heat.iter().map(|term| ("heat exergy", term.exergy));

        match values.into_iter().chain(heat).find(|(_, v)| !v.is_finite()) {
            Some((quantity, _)) => Err(UnitError::NonFinite { quantity }),
            None => Ok(()),
        }
    }
}

/// Inlet and outlet arity required by each category.
fn arity(category: EquipmentCategory) -> (Arity, Arity) {
    use Arity::{AtLeastOne, One};
    use EquipmentCategory as C;

    match category {
        C::Pump | C::Compressor | C::Cooler | C::Valve | C::Furnace => (One, One),
        C::Separator | C::FlashTank | C::Column => (One, AtLeastOne),
        C::Mixer => (AtLeastOne, One),
        C::HeatExchanger | C::Reactor => (AtLeastOne, AtLeastOne),
    }
}

fn check_arity(category: EquipmentCategory, unit: &UnitSpec) -> Result<(), UnitError> {
    let (inlets, outlets) = arity(category);
    if !inlets.accepts(unit.inlets.len()) {
        return Err(UnitError::InletCount {
            expected: inlets,
            found: unit.inlets.len(),
        });
    }
    if !outlets.accepts(unit.outlets.len()) {
        return Err(UnitError::OutletCount {
            expected: outlets,
            found: unit.outlets.len(),
        });
    }
    Ok(())
}

/// Analyzes one unit instance.
fn analyze_unit<S: ValueSource + ?Sized>(
    category: EquipmentCategory,
    unit: &UnitSpec,
    compressor: CompressorKind,
    ctx: &mut Context<'_, '_, S>,
) -> UnitOutcome {
    let outcome = check_arity(category, unit)
        .and_then(|()| balance(category, unit, compressor, ctx))
        .and_then(|balance| balance.check_finite().map(|()| balance));

    match outcome {
        Ok(balance) => Ok(UnitResult {
            name: unit.name.clone(),
            category,
            exergy_in: balance.exergy_in,
            exergy_out: balance.exergy_out,
            work: balance.work,
            heat: balance.heat,
            loss: balance.loss,
            efficiency: balance.efficiency,
        }),
        Err(reason) => Err(SkippedUnit {
            name: unit.name.clone(),
            category,
            reason,
        }),
    }
}

fn balance<S: ValueSource + ?Sized>(
    category: EquipmentCategory,
    unit: &UnitSpec,
    compressor: CompressorKind,
    ctx: &mut Context<'_, '_, S>,
) -> Result<Balance, UnitError> {
    match category {
        EquipmentCategory::Pump => Ok(work::shaft_only(unit, ctx)),
        EquipmentCategory::Compressor => match compressor {
            CompressorKind::Standard => Ok(work::shaft_only(unit, ctx)),
            CompressorKind::WithDuty => work::with_duty(unit, ctx),
        },
        EquipmentCategory::Cooler => thermal::cooler(unit, ctx),
        EquipmentCategory::Furnace => thermal::furnace(unit, ctx),
        EquipmentCategory::FlashTank => thermal::flash_tank(unit, ctx),
        EquipmentCategory::Column => thermal::column(unit, ctx),
        EquipmentCategory::Reactor => thermal::reactor(unit, ctx),
        EquipmentCategory::Mixer
        | EquipmentCategory::Valve
        | EquipmentCategory::Separator
        | EquipmentCategory::HeatExchanger => Ok(mixing::adiabatic(unit, ctx)),
    }
}

/// Analyzes every configured instance of `category`.
///
/// Units that cannot be analyzed are logged and kept in
/// [`CategoryLoss::skipped`]; they never abort the remaining units.
pub(crate) fn analyze_category<S: ValueSource + ?Sized>(
    category: EquipmentCategory,
    flowsheet: &Flowsheet,
    ctx: &mut Context<'_, '_, S>,
) -> CategoryLoss {
    let units: Vec<(&UnitSpec, CompressorKind)> = match category {
        EquipmentCategory::Compressor => flowsheet
            .compressors
            .iter()
            .map(|spec| (&spec.unit, spec.kind))
            .collect(),
        _ => flowsheet
            .units(category)
            .into_iter()
            .map(|unit| (unit, CompressorKind::Standard))
            .collect(),
    };

    let mut losses = CategoryLoss::new(category);
    for (unit, kind) in units {
        let outcome = analyze_unit(category, unit, kind, ctx);
        match &outcome {
            Ok(result) => tracing::debug!(
                unit = %result.name,
                %category,
                loss_kw = result.loss.get::<kilowatt>(),
                net_duty_kw = result
                    .heat
                    .iter()
                    .map(|term| term.flow.signed().get::<kilowatt>())
                    .sum::<f64>(),
                efficiency_pct = result.efficiency.percent(),
                "analyzed unit"
            ),
            Err(skipped) => tracing::error!(
                unit = %skipped.name,
                %category,
                reason = %skipped.reason,
                "skipping unit"
            ),
        }
        losses.record(outcome);
    }
    losses
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{
        models::exergy::core::test_support::{snapshot, with_context},
        support::{flowsheet::CompressorSpec, source::QuantityKind},
    };

    #[test]
    fn arity_table() {
        for category in EquipmentCategory::ALL {
            let (inlets, outlets) = arity(category);
            let single_inlet = !inlets.accepts(2);
            let single_outlet = !outlets.accepts(2);

            assert_eq!(
                single_inlet,
                !matches!(
                    category,
                    EquipmentCategory::Mixer
                        | EquipmentCategory::HeatExchanger
                        | EquipmentCategory::Reactor
                ),
                "{category}"
            );
            assert_eq!(
                single_outlet,
                matches!(
                    category,
                    EquipmentCategory::Pump
                        | EquipmentCategory::Compressor
                        | EquipmentCategory::Cooler
                        | EquipmentCategory::Mixer
                        | EquipmentCategory::Valve
                        | EquipmentCategory::Furnace
                ),
                "{category}"
            );
            assert!(!inlets.accepts(0) && !outlets.accepts(0), "{category}");
        }
    }

    #[test]
    fn malformed_unit_is_skipped_and_others_continue() {
        let snapshot = snapshot(&[
            (QuantityKind::StreamExergy, "A", 50.0),
            (QuantityKind::StreamExergy, "B", 48.0),
            (QuantityKind::StreamExergy, "C", 30.0),
            (QuantityKind::StreamExergy, "D", 27.0),
        ]);
        let flowsheet = Flowsheet {
            valves: vec![
                UnitSpec::new("VALVE-1", ["A"], ["B"]),
                UnitSpec::new("VALVE-X", ["A"], ["B", "C"]),
                UnitSpec::new("VALVE-2", ["C"], ["D"]),
                UnitSpec::new("VALVE-Y", Vec::<String>::new(), ["D"]),
            ],
            ..Flowsheet::default()
        };

        let (valves, _) = with_context(&snapshot, |ctx| {
            analyze_category(EquipmentCategory::Valve, &flowsheet, ctx)
        });

        assert_eq!(valves.units.len(), 2);
        assert_relative_eq!(valves.total().get::<kilowatt>(), 5.0);
        assert_eq!(
            valves.skipped[0].reason,
            UnitError::OutletCount {
                expected: Arity::One,
                found: 2
            }
        );
        assert_eq!(
            valves.skipped[1].reason,
            UnitError::InletCount {
                expected: Arity::One,
                found: 0
            }
        );
        assert_eq!(valves.skipped[1].name, "VALVE-Y");
    }

    #[test]
    fn overflowing_balance_is_skipped() {
        let snapshot = snapshot(&[
            (QuantityKind::StreamExergy, "A", f64::MAX),
            (QuantityKind::StreamExergy, "B", f64::MAX),
            (QuantityKind::StreamExergy, "C", 1.0),
        ]);
        let flowsheet = Flowsheet {
            mixers: vec![UnitSpec::new("MIX-1", ["A", "B"], ["C"])],
            ..Flowsheet::default()
        };

        let (mixers, _) = with_context(&snapshot, |ctx| {
            analyze_category(EquipmentCategory::Mixer, &flowsheet, ctx)
        });

        assert!(mixers.units.is_empty());
        assert_eq!(
            mixers.skipped[0].reason,
            UnitError::NonFinite {
                quantity: "inlet exergy"
            }
        );
        assert_relative_eq!(mixers.total().get::<kilowatt>(), 0.0);
    }

    #[test]
    fn negative_losses_do_not_reduce_the_total() {
        let snapshot = snapshot(&[
            (QuantityKind::StreamExergy, "A", 100.0),
            (QuantityKind::StreamExergy, "B", 90.0),
            (QuantityKind::StreamExergy, "C", 50.0),
            (QuantityKind::StreamExergy, "D", 65.0),
        ]);
        let flowsheet = Flowsheet {
            heat_exchangers: vec![
                UnitSpec::new("HEAT-1", ["A"], ["B"]),
                UnitSpec::new("HEAT-2", ["C"], ["D"]),
            ],
            ..Flowsheet::default()
        };

        let (exchangers, _) = with_context(&snapshot, |ctx| {
            analyze_category(EquipmentCategory::HeatExchanger, &flowsheet, ctx)
        });

        assert_relative_eq!(exchangers.units[1].loss.get::<kilowatt>(), -15.0);
        assert_relative_eq!(exchangers.total().get::<kilowatt>(), 10.0);
    }

    #[test]
    fn compressor_kind_selects_the_balance() {
        let snapshot = snapshot(&[
            (QuantityKind::StreamExergy, "IN", 100.0),
            (QuantityKind::StreamExergy, "OUT", 120.0),
            (QuantityKind::ShaftPower, "K-1", 30.0),
            (QuantityKind::ShaftPower, "K-2", 30.0),
            (QuantityKind::HeatDuty, "K-2", -40.0),
        ]);
        let flowsheet = Flowsheet {
            compressors: vec![
                CompressorSpec::standard(UnitSpec::new("K-1", ["IN"], ["OUT"])),
                CompressorSpec::with_duty(UnitSpec::new("K-2", ["IN"], ["OUT"])),
            ],
            ..Flowsheet::default()
        };

        let (compressors, warnings) = with_context(&snapshot, |ctx| {
            analyze_category(EquipmentCategory::Compressor, &flowsheet, ctx)
        });

        assert!(compressors.units[0].heat.is_empty());
        assert_eq!(compressors.units[1].heat.len(), 1);
        assert!(compressors.units[1].loss < compressors.units[0].loss);
        assert!(warnings.is_empty());
    }

    #[test]
    fn duplicate_block_names_are_analyzed_independently() {
        let snapshot = snapshot(&[
            (QuantityKind::StreamExergy, "S1", 100.0),
            (QuantityKind::StreamExergy, "S2", 90.0),
            (QuantityKind::StreamExergy, "S3", 60.0),
            (QuantityKind::StreamExergy, "S4", 58.0),
            (QuantityKind::HeatDuty, "COOLER-1", 0.0),
        ]);
        let flowsheet = Flowsheet {
            coolers: vec![
                UnitSpec::new("COOLER-1", ["S1"], ["S2"]),
                UnitSpec::new("COOLER-1", ["S3"], ["S4"]),
            ],
            ..Flowsheet::default()
        };

        let (coolers, _) = with_context(&snapshot, |ctx| {
            analyze_category(EquipmentCategory::Cooler, &flowsheet, ctx)
        });

        assert_eq!(coolers.units.len(), 2);
        assert_relative_eq!(coolers.total().get::<kilowatt>(), 12.0);
    }
}
