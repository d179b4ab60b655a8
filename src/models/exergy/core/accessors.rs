//! Semantic lookups against a [`ValueSource`].

use std::fmt;

use uom::si::{f64::Power, power::kilowatt};

use crate::support::source::{NodePath, PathTemplates, QuantityKind, ValueSource};

/// Why a lookup fell back to the default value.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupIssue {
    /// The node does not exist.
    Missing,
    /// The node exists but holds no finite value.
    Invalid(f64),
    /// The source failed while reading the node.
    SourceFailed(String),
}

impl fmt::Display for LookupIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("node not found"),
            Self::Invalid(value) => write!(f, "node has no valid value ({value})"),
            Self::SourceFailed(message) => write!(f, "source failed: {message}"),
        }
    }
}

/// A non-fatal lookup failure recorded during an analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupWarning {
    pub path: NodePath,
    pub issue: LookupIssue,
}

impl fmt::Display for LookupWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.issue)
    }
}

/// Reads stream and equipment quantities, substituting a default on failure.
///
/// Every fallback is logged and recorded, so a partially converged flowsheet
/// still produces a balance along with a list of what was missing. Values are
/// re-queried on every call.
pub(crate) struct QuantityReader<'a, S: ?Sized> {
    source: &'a S,
    paths: &'a PathTemplates,
    default: Power,
    warnings: Vec<LookupWarning>,
}

impl<'a, S: ValueSource + ?Sized> QuantityReader<'a, S> {
    /// Creates a reader that substitutes `default` for unreadable values.
    pub(crate) fn new(source: &'a S, paths: &'a PathTemplates, default: Power) -> Self {
        Self {
            source,
            paths,
            default,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn stream_exergy(&mut self, stream: &str) -> Power {
        self.read(QuantityKind::StreamExergy, stream)
    }

    pub(crate) fn shaft_power(&mut self, block: &str) -> Power {
        self.read(QuantityKind::ShaftPower, block)
    }

    pub(crate) fn heat_duty(&mut self, block: &str) -> Power {
        self.read(QuantityKind::HeatDuty, block)
    }

    pub(crate) fn flash_duty(&mut self, block: &str) -> Power {
        self.read(QuantityKind::FlashDuty, block)
    }

    pub(crate) fn reboiler_duty(&mut self, column: &str) -> Power {
        self.read(QuantityKind::ReboilerDuty, column)
    }

    pub(crate) fn condenser_duty(&mut self, column: &str) -> Power {
        self.read(QuantityKind::CondenserDuty, column)
    }

    /// Sums the exergy flows of several streams.
    pub(crate) fn total_stream_exergy<I>(&mut self, streams: I) -> Power
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        streams
            .into_iter()
            .fold(Power::new::<kilowatt>(0.0), |total, stream| {
                total + self.stream_exergy(stream.as_ref())
            })
    }

    /// Consumes the reader and returns its recorded warnings.
    pub(crate) fn into_warnings(self) -> Vec<LookupWarning> {
        self.warnings
    }

    fn read(&mut self, quantity: QuantityKind, name: &str) -> Power {
        let path = self.paths.path(quantity, name);
        match self.source.lookup(&path) {
            Ok(Some(value)) if value.is_finite() => Power::new::<kilowatt>(value),
            Ok(Some(value)) => self.fall_back(path, LookupIssue::Invalid(value)),
            Ok(None) => self.fall_back(path, LookupIssue::Missing),
            Err(err) => self.fall_back(path, LookupIssue::SourceFailed(err.to_string())),
        }
    }

    fn fall_back(&mut self, path: NodePath, issue: LookupIssue) -> Power {
        tracing::warn!(%path, %issue, "quantity lookup failed, using default");
        self.warnings.push(LookupWarning { path, issue });
        self.default
    }
}
