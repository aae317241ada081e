//! Scan configuration (JSON or programmatic).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::event::{EventField, FieldShape};
use crate::histogram::Histogram;
use crate::mapping::FieldMapping;

/// Object key of the jets tree.
pub const DEFAULT_TREE: &str = "treeJets";

/// Top-level scan configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Catalog key of the tree to scan.
    pub tree: String,
    /// Progress callback fires every `total / progress_divisions` rows.
    /// `0` disables progress reporting.
    pub progress_divisions: u64,
    /// Histogram slots, filled in order.
    pub histograms: Vec<HistogramSpec>,
    /// Field mapping; defaults to the `treeJets` layout.
    pub mapping: FieldMapping,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            tree: DEFAULT_TREE.into(),
            progress_divisions: 10,
            histograms: vec![HistogramSpec::towers(), HistogramSpec::jet_mass()],
            mapping: FieldMapping::jets(),
        }
    }
}

impl ScanConfig {
    /// Load from a JSON file; missing keys take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| Error::ResourceOpen { path: path.to_path_buf(), source })?;
        let cfg: ScanConfig = serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations the pipeline cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.tree.is_empty() {
            return Err(Error::Config("tree key must not be empty".into()));
        }
        if self.histograms.is_empty() {
            return Err(Error::Config("at least one histogram is required".into()));
        }
        for spec in &self.histograms {
            spec.validate()?;
        }
        Ok(())
    }
}

/// One histogram slot: what to fill, its binning, and how to draw it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramSpec {
    /// Histogram name.
    pub name: String,
    /// Scalar record field filled per event.
    pub field: EventField,
    pub bins: usize,
    pub lower: f64,
    pub upper: f64,
    /// Plot title.
    pub title: String,
    /// X-axis label.
    pub x_label: String,
    /// Line color, `#rrggbb`.
    pub color: String,
    /// Draw the entries/mean/std-dev box.
    pub show_stats: bool,
}

impl Default for HistogramSpec {
    fn default() -> Self {
        Self {
            name: "h".into(),
            field: EventField::JetMass,
            bins: 100,
            lower: 0.0,
            upper: 50.0,
            title: String::new(),
            x_label: String::new(),
            color: "#000000".into(),
            show_stats: true,
        }
    }
}

impl HistogramSpec {
    /// Tower multiplicity: 50 bins over [0, 50).
    pub fn towers() -> Self {
        Self {
            name: "ntowers".into(),
            field: EventField::NTowers,
            bins: 50,
            lower: 0.0,
            upper: 50.0,
            title: "Towers multiplicity".into(),
            x_label: "# of towers".into(),
            color: "#ff0000".into(),
            show_stats: true,
        }
    }

    /// Reconstructed jet mass: 100 bins over [0, 50).
    pub fn jet_mass() -> Self {
        Self {
            name: "jet_mass".into(),
            field: EventField::JetMass,
            bins: 100,
            lower: 0.0,
            upper: 50.0,
            title: "Reconstructed Jet Mass".into(),
            x_label: "Jet Mass [GeV/c^2]".into(),
            color: "#0000ff".into(),
            show_stats: true,
        }
    }

    /// Check binning and that the source field is a scalar.
    pub fn validate(&self) -> Result<()> {
        if self.field.shape() == FieldShape::FloatSeq {
            return Err(Error::Config(format!(
                "histogram '{}': field {} is a sequence, not a scalar",
                self.name, self.field
            )));
        }
        self.build().map(|_| ()).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("histogram '{}': {msg}", self.name)),
            other => other,
        })
    }

    /// Empty accumulator with this slot's geometry.
    pub fn build(&self) -> Result<Histogram> {
        Histogram::new(self.bins, self.lower, self.upper)
    }
}
