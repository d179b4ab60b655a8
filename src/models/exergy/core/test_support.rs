use uom::{ConstZero, si::f64::Power};

use crate::support::{
    exergy::ReferenceTemperatures,
    flowsheet::Flowsheet,
    source::{PathTemplates, QuantityKind, SnapshotSource},
};

use super::{Context, LookupWarning, QuantityReader};

/// Hydrotreated vegetable oil plant used as an end-to-end fixture.
pub(crate) const HVO_FLOWSHEET: &str = r#"
feeds = ["MKUP-R1", "TGO-1", "MKUP-R3"]
products = ["WATER-1", "LIGHTS", "BIO-QAV", "DIESEL", "TAIL-GAS"]

pumps = [
    { name = "PUMP-1", inlets = ["TGO-1"], outlets = ["TGO-2"] },
    { name = "PUMP-2", inlets = ["ALKENE6"], outlets = ["ALKENE7"] },
    { name = "PUMP-3", inlets = ["H-DIESEL"], outlets = ["H2DIESEL"] },
    { name = "PUMP-4", inlets = ["HOT-AK15"], outlets = ["ALKENE16"] },
]

compressors = [
    { name = "COMPR-1", inlets = ["GASES4"], outlets = ["GASES-5"] },
    { name = "M-COMPR", inlets = ["H2-REC-2"], outlets = ["M-H2-REC"], kind = "with-duty" },
    { name = "M-COMPR2", inlets = ["H2-REC-3"], outlets = ["H2-REC-4"], kind = "with-duty" },
]

coolers = [
    { name = "COOLER-1", inlets = ["TGO+H2-5"], outlets = ["ALKENE1"] },
    { name = "COOLER-1", inlets = ["ALKENE3"], outlets = ["ALKENE4"] },
    { name = "COOLER-2", inlets = ["ALKENE12"], outlets = ["ALKENE13"] },
    { name = "COOLER-4", inlets = ["C-DIESEL"], outlets = ["DIESEL"] },
    { name = "COOLER-5", inlets = ["QBIO-QAV"], outlets = ["BIO-QAV"] },
]

mixers = [
    { name = "MIX-1", inlets = ["TGO-2", "H2-TO-R1"], outlets = ["TGO+H2"] },
    { name = "MIXER-2", inlets = ["GASES1", "GASES2", "GASES3"], outlets = ["GASES4"] },
    { name = "MIXER-3", inlets = ["H2-REC-4", "ALKENE7", "MKUP-R3"], outlets = ["ALKENE8"] },
    { name = "MIX-4", inlets = ["MKUP-R1", "M-H2-REC"], outlets = ["H2-TO-R1"] },
]

valves = [
    { name = "VALVE-1", inlets = ["ALKENE4"], outlets = ["ALKENE5"] },
    { name = "VALVE-2", inlets = ["ALKENE14"], outlets = ["ALKENE15"] },
]

separators = [
    { name = "SEP", inlets = ["GASES-5"], outlets = ["TAIL-GAS", "H2-REC"] },
]

furnaces = [
    { name = "FURNACE1", inlets = ["TGO+H2-3"], outlets = ["TGO+H2-4"] },
    { name = "FURNACE2", inlets = ["HOT-ALK9"], outlets = ["ALKENE10"] },
]

heat_exchangers = [
    { name = "HEAT-1", inlets = ["H-AK1-3", "TGO+H2"], outlets = ["TGO+H2-1", "ALKENE2"] },
    { name = "HEAT-2", inlets = ["TGO+H2-1", "H2DIESEL"], outlets = ["C-DIESEL", "TGO+H2-2"] },
    { name = "HEAT-3", inlets = ["TGO+H2-2", "ALKENE1"], outlets = ["TGO+H2-3", "HOT-AK1"] },
    { name = "HEAT-4", inlets = ["HOT-AK1", "ALKENE15"], outlets = ["H-AK1-2", "HOT-AK15"] },
    { name = "HEAT-5", inlets = ["H-AK1-2", "ALKENE8"], outlets = ["H-AK1-3", "ALKENE9"] },
    { name = "HEAT-6", inlets = ["ALKENE9", "ALKENE11"], outlets = ["HOT-ALK9", "ALKENE12"] },
]

flash_tanks = [
    { name = "FLASH-1", inlets = ["ALKENE3"], outlets = ["ALKENE4", "WATER-1", "GASES1"] },
    { name = "FLASH2", inlets = ["ALKENE5"], outlets = ["GASES2", "ALKENE6"] },
    { name = "FLASH3", inlets = ["ALKENE13"], outlets = ["GASES3", "ALKENE14"] },
]

columns = [
    { name = "DEST-COL", inlets = ["ALKENE16"], outlets = ["LIGHTS", "QBIO-QAV", "H-DIESEL"] },
]

reactors = [
    { name = "R-1", inlets = ["TGO+H2-4"], outlets = ["TGO+H2-5"] },
    { name = "R-2", inlets = ["TGO+H2-5"], outlets = ["ALKENE1"] },
    { name = "R-3", inlets = ["ALKENE10"], outlets = ["ALKENE11"] },
]
"#;

pub(crate) fn hvo_flowsheet() -> Flowsheet {
    Flowsheet::from_toml_str(HVO_FLOWSHEET).expect("fixture flowsheet parses")
}

/// Builds a snapshot using the default path templates.
pub(crate) fn snapshot(values: &[(QuantityKind, &str, f64)]) -> SnapshotSource {
    let paths = PathTemplates::default();
    let mut snapshot = SnapshotSource::new();
    for &(kind, name, value) in values {
        snapshot.insert_quantity(&paths, kind, name, value);
    }
    snapshot
}

/// Gives every stream in `flowsheet` the same exergy flow.
pub(crate) fn uniform_streams(flowsheet: &Flowsheet, snapshot: &mut SnapshotSource, value: f64) {
    let paths = &flowsheet.paths;
    let units = flowsheet
        .compressors
        .iter()
        .map(|c| &c.unit)
        .chain(&flowsheet.pumps)
        .chain(&flowsheet.coolers)
        .chain(&flowsheet.mixers)
        .chain(&flowsheet.valves)
        .chain(&flowsheet.separators)
        .chain(&flowsheet.furnaces)
        .chain(&flowsheet.heat_exchangers)
        .chain(&flowsheet.flash_tanks)
        .chain(&flowsheet.columns)
        .chain(&flowsheet.reactors);

    let streams = units
        .flat_map(|unit| unit.inlets.iter().chain(&unit.outlets))
        .chain(&flowsheet.feeds)
        .chain(&flowsheet.products);

    for stream in streams {
        snapshot.insert_quantity(paths, QuantityKind::StreamExergy, stream, value);
    }
}

/// Runs `f` against a fresh analysis context over `snapshot`.
///
/// Returns the result along with any lookup warnings recorded.
pub(crate) fn with_context<T>(
    snapshot: &SnapshotSource,
    f: impl FnOnce(&mut Context<'_, '_, SnapshotSource>) -> T,
) -> (T, Vec<LookupWarning>) {
    let paths = PathTemplates::default();
    let temps = ReferenceTemperatures::default();
    let mut reader = QuantityReader::new(snapshot, &paths, Power::ZERO);
    let output = f(&mut Context {
        reader: &mut reader,
        temps: &temps,
    });
    (output, reader.into_warnings())
}
