//! Mixers, valves, separators and heat exchangers.
//!
//! None of these carry a work or heat term: a heat exchanger's duty is
//! already reflected in its stream exergies.

use crate::support::{flowsheet::UnitSpec, source::ValueSource};

use super::{Balance, Context};

/// `loss = ΣEx_in - ΣEx_out`.
pub(super) fn adiabatic<S: ValueSource + ?Sized>(
    unit: &UnitSpec,
    ctx: &mut Context<'_, '_, S>,
) -> Balance {
    let exergy_in = ctx.reader.total_stream_exergy(&unit.inlets);
    let exergy_out = ctx.reader.total_stream_exergy(&unit.outlets);
    Balance::adiabatic(exergy_in, exergy_out)
}
