//! Units whose balance includes one or more heat duties.

use crate::support::{
    exergy::{Efficiency, ThermalRole},
    flowsheet::UnitSpec,
    source::ValueSource,
};

use super::{Balance, Context, UnitError};

/// `loss = Ex_in - Ex_out - ExQ`.
///
/// The duty is always treated as removed, whatever its reported sign.
pub(super) fn cooler<S: ValueSource + ?Sized>(
    unit: &UnitSpec,
    ctx: &mut Context<'_, '_, S>,
) -> Result<Balance, UnitError> {
    let exergy_in = ctx.reader.total_stream_exergy(&unit.inlets);
    let exergy_out = ctx.reader.total_stream_exergy(&unit.outlets);
    let duty = ctx.reader.heat_duty(&unit.name);
    let heat = ctx.heat_term(ThermalRole::Cooler, duty)?;

    let loss = exergy_in - exergy_out - heat.exergy;
    Ok(Balance {
        efficiency: Efficiency::from_balance(loss, exergy_in),
        heat: vec![heat],
        loss,
        ..Balance::adiabatic(exergy_in, exergy_out)
    })
}

/// `loss = Ex_in + ExQ - Ex_out`.
pub(super) fn furnace<S: ValueSource + ?Sized>(
    unit: &UnitSpec,
    ctx: &mut Context<'_, '_, S>,
) -> Result<Balance, UnitError> {
    let exergy_in = ctx.reader.total_stream_exergy(&unit.inlets);
    let exergy_out = ctx.reader.total_stream_exergy(&unit.outlets);
    let duty = ctx.reader.heat_duty(&unit.name);
    let heat = ctx.heat_term(ThermalRole::Furnace, duty)?;

    let supplied = exergy_in + heat.exergy;
    let loss = supplied - exergy_out;
    Ok(Balance {
        efficiency: Efficiency::from_balance(loss, supplied),
        heat: vec![heat],
        loss,
        ..Balance::adiabatic(exergy_in, exergy_out)
    })
}

/// `loss = Ex_in + ExQ - ΣEx_out`.
pub(super) fn flash_tank<S: ValueSource + ?Sized>(
    unit: &UnitSpec,
    ctx: &mut Context<'_, '_, S>,
) -> Result<Balance, UnitError> {
    let exergy_in = ctx.reader.total_stream_exergy(&unit.inlets);
    let exergy_out = ctx.reader.total_stream_exergy(&unit.outlets);
    let duty = ctx.reader.flash_duty(&unit.name);
    let heat = ctx.heat_term(ThermalRole::Flash, duty)?;

    let supplied = exergy_in + heat.exergy;
    let loss = supplied - exergy_out;
    Ok(Balance {
        efficiency: Efficiency::from_balance(loss, supplied),
        heat: vec![heat],
        loss,
        ..Balance::adiabatic(exergy_in, exergy_out)
    })
}

/// `loss = Ex_in + ExQ_reboiler + ExQ_condenser - ΣEx_out`.
pub(super) fn column<S: ValueSource + ?Sized>(
    unit: &UnitSpec,
    ctx: &mut Context<'_, '_, S>,
) -> Result<Balance, UnitError> {
    let exergy_in = ctx.reader.total_stream_exergy(&unit.inlets);
    let exergy_out = ctx.reader.total_stream_exergy(&unit.outlets);
    let reboiler_duty = ctx.reader.reboiler_duty(&unit.name);
    let condenser_duty = ctx.reader.condenser_duty(&unit.name);
    let reboiler = ctx.heat_term(ThermalRole::Reboiler, reboiler_duty)?;
    let condenser = ctx.heat_term(ThermalRole::Condenser, condenser_duty)?;

    let supplied = exergy_in + reboiler.exergy + condenser.exergy;
    let loss = supplied - exergy_out;
    Ok(Balance {
        efficiency: Efficiency::from_balance(loss, supplied),
        heat: vec![reboiler, condenser],
        loss,
        ..Balance::adiabatic(exergy_in, exergy_out)
    })
}

/// `loss = ΣEx_in - ΣEx_out - ExQ`, relative to `ΣEx_in - ExQ`.
pub(super) fn reactor<S: ValueSource + ?Sized>(
    unit: &UnitSpec,
    ctx: &mut Context<'_, '_, S>,
) -> Result<Balance, UnitError> {
    let exergy_in = ctx.reader.total_stream_exergy(&unit.inlets);
    let exergy_out = ctx.reader.total_stream_exergy(&unit.outlets);
    let duty = ctx.reader.heat_duty(&unit.name);
    let heat = ctx.heat_term(ThermalRole::Reactor, duty)?;

    let net_in = exergy_in - heat.exergy;
    let loss = net_in - exergy_out;
    Ok(Balance {
        efficiency: Efficiency::from_balance(loss, net_in),
        heat: vec![heat],
        loss,
        ..Balance::adiabatic(exergy_in, exergy_out)
    })
}
