//! # Twine Exergy
//!
//! Second-law (exergy) balance models for process flowsheets, built for
//! [Twine](https://github.com/isentropic-dev/twine).
//!
//! Given a plant topology and read access to a converged process
//! simulation, the models compute exergy destruction per unit and per
//! equipment category, and a top-down balance of the whole plant.
//!
//! ## Crate layout
//!
//! - [`models`]: Domain-specific [`twine_core::Model`] implementations.
//! - [`support`]: Supporting utilities used by models.
//!
//! ## Logging
//!
//! Diagnostics are emitted through [`tracing`]. Lookup fallbacks and large
//! divergences between plant and category losses are warnings, skipped units
//! and failed runs are errors. The crate never installs a subscriber.
//!
//! ## Utility code lifecycle
//!
//! Modules in [`support`] are part of the public API because they're useful,
//! but their APIs are not stable. Breaking changes may occur as needed.
//!
//! Utility code starts in a model's internal `core` module and moves to
//! [`support`] once it is useful across models or outside this crate.
//! Only utilities in [`support`] are part of the public API.

pub mod models;
pub mod support;
