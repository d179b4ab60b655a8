//! Supporting utilities used by models.
//!
//! - [`constraint`]: Numeric invariants carried in the type
//! - [`exergy`]: Heat flow direction, reference temperatures, thermal exergy
//!   and efficiency
//! - [`flowsheet`]: The plant topology and analysis settings
//! - [`source`]: Read-only access to simulator results

pub mod constraint;
pub mod exergy;
pub mod flowsheet;
pub mod source;
