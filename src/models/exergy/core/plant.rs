//! Whole-plant exergy balance.

use std::collections::HashSet;

use uom::{
    ConstZero,
    si::{f64::Power, power::kilowatt},
};

use crate::support::{
    exergy::{HeatFlow, ReferenceTemperatures, ThermalRole},
    flowsheet::{CompressorKind, EquipmentCategory, Flowsheet, UnitSpec},
    source::ValueSource,
};

use super::{
    BalanceError, CategoryBreakdown, Context, ExergyReport, PlantBalance, QuantityReader,
    analyze_category,
};

/// Runs every category analyzer and the top-down plant balance.
///
/// Lookup failures and unanalyzable units degrade the report but never fail
/// the run. Only conditions that make the whole balance meaningless do.
///
/// # Errors
///
/// Returns a [`BalanceError`] if the flowsheet is empty or has invalid
/// settings, or if a plant-wide total is not finite.
pub(crate) fn analyze_plant<S: ValueSource + ?Sized>(
    flowsheet: &Flowsheet,
    source: &S,
) -> Result<ExergyReport, BalanceError> {
    if flowsheet.is_empty() {
        return Err(BalanceError::EmptyFlowsheet);
    }
    let temps = flowsheet.reference_temperatures()?;
    let threshold = flowsheet.divergence_threshold()?;
    let default = flowsheet.lookup_default()?;

    let mut reader = QuantityReader::new(source, &flowsheet.paths, default);

    let feed_exergy = reader.total_stream_exergy(&flowsheet.feeds);

    let mut ctx = Context {
        reader: &mut reader,
        temps: &temps,
    };
    let categories: Vec<_> = EquipmentCategory::ALL
        .iter()
        .map(|&category| analyze_category(category, flowsheet, &mut ctx))
        .collect();

    let work_exergy_in = work_in(flowsheet, &mut reader);
    let heat_exergy_in = heat_in(flowsheet, &mut reader, &temps);
    let heat_exergy_out = heat_out(flowsheet, &mut reader, &temps);

    let product_exergy = reader.total_stream_exergy(&flowsheet.products);

    let plant = PlantBalance::new(
        feed_exergy,
        product_exergy,
        work_exergy_in,
        heat_exergy_in,
        heat_exergy_out,
    );
    if let Some(metric) = plant.non_finite_metric() {
        return Err(BalanceError::NonFinite { metric });
    }

    let breakdown = CategoryBreakdown::new(&categories);
    let divergence = plant.plant_loss - breakdown.total;
    let divergence_flagged = divergence.abs() > plant.plant_loss.abs() * threshold;
    if divergence_flagged {
        tracing::warn!(
            plant_loss_kw = plant.plant_loss.get::<kilowatt>(),
            category_loss_kw = breakdown.total.get::<kilowatt>(),
            divergence_kw = divergence.get::<kilowatt>(),
            threshold,
            "plant loss and summed category losses diverge"
        );
    }

    let warnings = reader.into_warnings();
    tracing::info!(
        total_in_kw = plant.total_exergy_in.get::<kilowatt>(),
        total_out_kw = plant.total_exergy_out.get::<kilowatt>(),
        plant_loss_kw = plant.plant_loss.get::<kilowatt>(),
        complete_efficiency_pct = plant.complete_efficiency.percent(),
        lookup_warnings = warnings.len(),
        "plant exergy balance complete"
    );

    Ok(ExergyReport {
        categories,
        breakdown,
        plant,
        divergence,
        divergence_flagged,
        warnings,
    })
}

/// Block names in first-occurrence order, each listed once.
fn distinct_names<'f>(units: impl IntoIterator<Item = &'f UnitSpec>) -> Vec<&'f str> {
    let mut seen = HashSet::new();
    units
        .into_iter()
        .map(|unit| unit.name.as_str())
        .filter(|name| seen.insert(*name))
        .collect()
}

/// Shaft power of every pump and compressor.
fn work_in<S: ValueSource + ?Sized>(
    flowsheet: &Flowsheet,
    reader: &mut QuantityReader<'_, S>,
) -> Power {
    let pumps = distinct_names(&flowsheet.pumps);
    let compressors = distinct_names(flowsheet.compressors.iter().map(|c| &c.unit));

    pumps
        .into_iter()
        .chain(compressors)
        .fold(Power::ZERO, |total, name| total + reader.shaft_power(name))
}

/// Exergy of furnace, reboiler and flash duties that supply heat.
fn heat_in<S: ValueSource + ?Sized>(
    flowsheet: &Flowsheet,
    reader: &mut QuantityReader<'_, S>,
    temps: &ReferenceTemperatures,
) -> Power {
    let mut total = Power::ZERO;
    for name in distinct_names(&flowsheet.furnaces) {
        total += supplied(temps, ThermalRole::Furnace, reader.heat_duty(name));
    }
    for name in distinct_names(&flowsheet.columns) {
        total += supplied(temps, ThermalRole::Reboiler, reader.reboiler_duty(name));
    }
    for name in distinct_names(&flowsheet.flash_tanks) {
        total += supplied(temps, ThermalRole::Flash, reader.flash_duty(name));
    }
    total
}

/// Exergy of compressor, reactor, cooler and condenser duties that remove heat.
///
/// Standard compressors report no duty and are not queried.
fn heat_out<S: ValueSource + ?Sized>(
    flowsheet: &Flowsheet,
    reader: &mut QuantityReader<'_, S>,
    temps: &ReferenceTemperatures,
) -> Power {
    let with_duty = flowsheet
        .compressors
        .iter()
        .filter(|c| c.kind == CompressorKind::WithDuty)
        .map(|c| &c.unit);

    let mut total = Power::ZERO;
    for name in distinct_names(with_duty) {
        total += removed(temps, ThermalRole::Compressor, reader.heat_duty(name));
    }
    for name in distinct_names(&flowsheet.reactors) {
        total += removed(temps, ThermalRole::Reactor, reader.heat_duty(name));
    }
    for name in distinct_names(&flowsheet.coolers) {
        total += removed(temps, ThermalRole::Cooler, reader.heat_duty(name));
    }
    for name in distinct_names(&flowsheet.columns) {
        total += removed(temps, ThermalRole::Condenser, reader.condenser_duty(name));
    }
    total
}

fn supplied(temps: &ReferenceTemperatures, role: ThermalRole, duty: Power) -> Power {
    match HeatFlow::from_signed(duty) {
        Ok(flow @ HeatFlow::In(_)) => temps.exergy_of(role, flow.magnitude()),
        _ => Power::ZERO,
    }
}

fn removed(temps: &ReferenceTemperatures, role: ThermalRole, duty: Power) -> Power {
    match HeatFlow::from_signed(duty) {
        Ok(flow @ HeatFlow::Out(_)) => temps.exergy_of(role, flow.magnitude()),
        _ => Power::ZERO,
    }
}
