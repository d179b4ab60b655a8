//! Read-only access to simulator results.
//!
//! A process simulator exposes its results as a hierarchical tree of named
//! nodes. [`ValueSource`] is the only seam between that tree and the exergy
//! balance: given a [`NodePath`], it returns a scalar or reports that the
//! node is absent. [`PathTemplates`] maps each quantity the balance needs to
//! the path where the simulator stores it.
//!
//! [`SnapshotSource`] is an in-memory implementation, useful for tests and
//! for callers that export simulator state ahead of the analysis.
//!
//! ```
//! use twine_exergy::support::source::{PathTemplates, QuantityKind, SnapshotSource, ValueSource};
//!
//! let paths = PathTemplates::default();
//! let mut snapshot = SnapshotSource::new();
//! snapshot.insert_quantity(&paths, QuantityKind::ShaftPower, "PUMP-1", 10.0);
//!
//! let path = paths.path(QuantityKind::ShaftPower, "PUMP-1");
//! assert_eq!(path.as_str(), r"\Data\Blocks\PUMP-1\Output\WNET");
//! assert_eq!(snapshot.lookup(&path).unwrap(), Some(10.0));
//! ```

use std::{collections::HashMap, convert::Infallible, fmt};

use serde::{Deserialize, Serialize};

/// Hierarchical address of one scalar in the simulator tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath(String);

impl NodePath {
    /// Creates a path from its string form.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for NodePath {
    fn from(path: String) -> Self {
        Self(path)
    }
}

/// A read-only source of scalar simulator results.
///
/// Values are in the simulator's reporting units, kW for every quantity the
/// exergy balance reads.
pub trait ValueSource {
    /// Error raised when the source itself fails to read a node.
    type Error: std::error::Error;

    /// Looks up the scalar stored at `path`.
    ///
    /// Returns `Ok(None)` when the node does not exist. A node that exists
    /// but holds no usable number may be reported as a non-finite value.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` if the source could not be queried.
    fn lookup(&self, path: &NodePath) -> Result<Option<f64>, Self::Error>;
}

impl<S: ValueSource + ?Sized> ValueSource for &S {
    type Error = S::Error;

    fn lookup(&self, path: &NodePath) -> Result<Option<f64>, Self::Error> {
        (**self).lookup(path)
    }
}

/// A quantity the exergy balance reads from the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuantityKind {
    /// Total exergy flow of a stream.
    StreamExergy,
    /// Net shaft power of a pump or compressor.
    ShaftPower,
    /// Calculated heat duty of a block.
    HeatDuty,
    /// Calculated heat duty of a flash tank.
    FlashDuty,
    /// Reboiler duty of a distillation column.
    ReboilerDuty,
    /// Condenser duty of a distillation column.
    CondenserDuty,
}

/// Placeholder substituted with the stream or block name.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Path template for each [`QuantityKind`].
///
/// Each template contains [`NAME_PLACEHOLDER`], replaced by the stream or
/// block name when a path is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathTemplates {
    pub stream_exergy: String,
    pub shaft_power: String,
    pub heat_duty: String,
    pub flash_duty: String,
    pub reboiler_duty: String,
    pub condenser_duty: String,
}

impl Default for PathTemplates {
    fn default() -> Self {
        Self {
            stream_exergy: r"\Data\Streams\{name}\Output\STRM_UPP\EXERGYFL\MIXED\TOTAL".into(),
            shaft_power: r"\Data\Blocks\{name}\Output\WNET".into(),
            heat_duty: r"\Data\Blocks\{name}\Output\QCALC".into(),
            flash_duty: r"\Data\Blocks\{name}\Output\QCALC".into(),
            reboiler_duty: r"\Data\Blocks\{name}\Output\REB_DUTY".into(),
            condenser_duty: r"\Data\Blocks\{name}\Output\COND_DUTY".into(),
        }
    }
}

impl PathTemplates {
    /// Returns the template for `quantity`.
    #[must_use]
    pub fn template(&self, quantity: QuantityKind) -> &str {
        match quantity {
            QuantityKind::StreamExergy => &self.stream_exergy,
            QuantityKind::ShaftPower => &self.shaft_power,
            QuantityKind::HeatDuty => &self.heat_duty,
            QuantityKind::FlashDuty => &self.flash_duty,
            QuantityKind::ReboilerDuty => &self.reboiler_duty,
            QuantityKind::CondenserDuty => &self.condenser_duty,
        }
    }

    /// Builds the path of `quantity` for the named stream or block.
    #[must_use]
    pub fn path(&self, quantity: QuantityKind, name: &str) -> NodePath {
        NodePath(self.template(quantity).replace(NAME_PLACEHOLDER, name))
    }
}

/// An in-memory [`ValueSource`] backed by a map of node values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotSource {
    values: HashMap<NodePath, f64>,
}

impl SnapshotSource {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value at `path`, replacing any previous value.
    pub fn insert(&mut self, path: impl Into<NodePath>, value: f64) {
        self.values.insert(path.into(), value);
    }

    /// Stores the value of `quantity` for the named stream or block.
    pub fn insert_quantity(
        &mut self,
        paths: &PathTemplates,
        quantity: QuantityKind,
        name: &str,
        value: f64,
    ) {
        self.values.insert(paths.path(quantity, name), value);
    }

    /// Removes the value at `path`, if present.
    pub fn remove(&mut self, path: &NodePath) -> Option<f64> {
        self.values.remove(path)
    }

    /// Number of stored nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no nodes are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(NodePath, f64)> for SnapshotSource {
    fn from_iter<I: IntoIterator<Item = (NodePath, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl ValueSource for SnapshotSource {
    type Error = Infallible;

    fn lookup(&self, path: &NodePath) -> Result<Option<f64>, Self::Error> {
        Ok(self.values.get(path).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_follow_simulator_tree() {
        let paths = PathTemplates::default();
        assert_eq!(
            paths.path(QuantityKind::StreamExergy, "TGO-1").as_str(),
            r"\Data\Streams\TGO-1\Output\STRM_UPP\EXERGYFL\MIXED\TOTAL"
        );
        assert_eq!(
            paths.path(QuantityKind::ReboilerDuty, "DEST-COL").as_str(),
            r"\Data\Blocks\DEST-COL\Output\REB_DUTY"
        );
        assert_eq!(
            paths.path(QuantityKind::CondenserDuty, "DEST-COL").as_str(),
            r"\Data\Blocks\DEST-COL\Output\COND_DUTY"
        );
        assert_eq!(
            paths.path(QuantityKind::FlashDuty, "FLASH2"),
            paths.path(QuantityKind::HeatDuty, "FLASH2")
        );
    }

    #[test]
    fn custom_templates_deserialize_partially() {
        let paths: PathTemplates =
            toml::from_str(r#"shaft_power = "/blocks/{name}/power""#).unwrap();
        assert_eq!(
            paths.path(QuantityKind::ShaftPower, "P-1").as_str(),
            "/blocks/P-1/power"
        );
        assert_eq!(paths.heat_duty, PathTemplates::default().heat_duty);
    }

    #[test]
    fn snapshot_reports_absent_nodes() {
        let mut snapshot = SnapshotSource::new();
        snapshot.insert("a", 1.5);

        assert_eq!(snapshot.lookup(&NodePath::from("a")).unwrap(), Some(1.5));
        assert_eq!(snapshot.lookup(&NodePath::from("b")).unwrap(), None);

        assert_eq!(snapshot.remove(&NodePath::from("a")), Some(1.5));
        assert!(snapshot.is_empty());
    }

    #[test]
    fn snapshot_deserializes_from_table() {
        let snapshot: SnapshotSource = toml::from_str(
            r#"
            "/streams/FEED" = 120.0
            "/blocks/P-1" = 4.5
            "#,
        )
        .unwrap();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(
            snapshot.lookup(&NodePath::from("/blocks/P-1")).unwrap(),
            Some(4.5)
        );
    }
}
