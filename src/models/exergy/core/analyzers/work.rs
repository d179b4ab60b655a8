//! Pumps and compressors: units driven by shaft work.

use crate::support::{
    exergy::{Efficiency, HeatFlow, ThermalRole},
    flowsheet::UnitSpec,
    source::ValueSource,
};

use super::{Balance, Context, UnitError};

/// `loss = Ex_in + P - Ex_out`, used for pumps and standard compressors.
pub(super) fn shaft_only<S: ValueSource + ?Sized>(
    unit: &UnitSpec,
    ctx: &mut Context<'_, '_, S>,
) -> Balance {
    let exergy_in = ctx.reader.total_stream_exergy(&unit.inlets);
    let work = ctx.reader.shaft_power(&unit.name);
    let exergy_out = ctx.reader.total_stream_exergy(&unit.outlets);

    let supplied = exergy_in + work;
    let loss = supplied - exergy_out;

    Balance {
        exergy_in,
        exergy_out,
        work,
        heat: Vec::new(),
        loss,
        efficiency: Efficiency::from_balance(loss, supplied),
    }
}

/// A compressor with intercooling that also reports a heat duty.
///
/// Heat removed leaves as an exergy output, heat supplied enters as an input.
pub(super) fn with_duty<S: ValueSource + ?Sized>(
    unit: &UnitSpec,
    ctx: &mut Context<'_, '_, S>,
) -> Result<Balance, UnitError> {
    let exergy_in = ctx.reader.total_stream_exergy(&unit.inlets);
    let work = ctx.reader.shaft_power(&unit.name);
    let exergy_out = ctx.reader.total_stream_exergy(&unit.outlets);
    let duty = ctx.reader.heat_duty(&unit.name);
    let heat = ctx.heat_term(ThermalRole::Compressor, duty)?;

    let supplied = exergy_in + work;
    let loss = match heat.flow {
        HeatFlow::Out(_) => supplied - exergy_out - heat.exergy,
        HeatFlow::In(_) | HeatFlow::None => supplied + heat.exergy - exergy_out,
    };

    Ok(Balance {
        exergy_in,
        exergy_out,
        work,
        heat: vec![heat],
        loss,
        efficiency: Efficiency::from_balance(loss, supplied),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::power::kilowatt;

    use crate::{
        models::exergy::core::test_support::{snapshot, with_context},
        support::source::{QuantityKind, SnapshotSource},
    };

    fn compressor_ex_q(duty: f64) -> f64 {
        duty.abs() * (1.0 - 298.15 / 350.15)
    }

    #[test]
    fn pump_balance() {
        let snapshot = snapshot(&[
            (QuantityKind::StreamExergy, "TGO-1", 100.0),
            (QuantityKind::StreamExergy, "TGO-2", 95.0),
            (QuantityKind::ShaftPower, "PUMP-1", 10.0),
        ]);

        let (pump, warnings) = with_context(&snapshot, |ctx| {
            shaft_only(&UnitSpec::new("PUMP-1", ["TGO-1"], ["TGO-2"]), ctx)
        });

        assert_relative_eq!(pump.loss.get::<kilowatt>(), 15.0);
        assert_relative_eq!(
            pump.efficiency.percent(),
            (1.0 - 15.0 / 110.0) * 100.0,
            epsilon = 1e-9
        );
        assert!(pump.heat.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn idle_pump_has_zero_efficiency() {
        let (pump, warnings) = with_context(&SnapshotSource::new(), |ctx| {
            shaft_only(&UnitSpec::new("PUMP-9", ["IN"], ["OUT"]), ctx)
        });

        assert_relative_eq!(pump.loss.get::<kilowatt>(), 0.0);
        assert_relative_eq!(pump.efficiency.percent(), 0.0);
        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn compressor_heat_removed_is_an_output() {
        let snapshot = snapshot(&[
            (QuantityKind::StreamExergy, "H2-REC-2", 400.0),
            (QuantityKind::StreamExergy, "M-H2-REC", 450.0),
            (QuantityKind::ShaftPower, "M-COMPR", 80.0),
            (QuantityKind::HeatDuty, "M-COMPR", -70.0),
        ]);

        let (compressor, _) = with_context(&snapshot, |ctx| {
            with_duty(&UnitSpec::new("M-COMPR", ["H2-REC-2"], ["M-H2-REC"]), ctx)
        });
        let compressor = compressor.unwrap();

        let ex_q = compressor_ex_q(-70.0);
        assert!(compressor.heat[0].flow.is_removed());
        assert_relative_eq!(
            compressor.heat[0].exergy.get::<kilowatt>(),
            ex_q,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            compressor.loss.get::<kilowatt>(),
            400.0 + 80.0 - 450.0 - ex_q,
            epsilon = 1e-9
        );
    }

    #[test]
    fn compressor_heat_supplied_is_an_input() {
        let snapshot = snapshot(&[
            (QuantityKind::StreamExergy, "IN", 400.0),
            (QuantityKind::StreamExergy, "OUT", 450.0),
            (QuantityKind::ShaftPower, "K-1", 80.0),
            (QuantityKind::HeatDuty, "K-1", 70.0),
        ]);

        let (compressor, _) = with_context(&snapshot, |ctx| {
            with_duty(&UnitSpec::new("K-1", ["IN"], ["OUT"]), ctx)
        });

        assert_relative_eq!(
            compressor.unwrap().loss.get::<kilowatt>(),
            400.0 + 80.0 + compressor_ex_q(70.0) - 450.0,
            epsilon = 1e-9
        );
    }
}
