//! Visualization layer: chart kinds, figure building and export.
//!
//! ```text
//!   selected names + ChartKind
//!        │
//!        ▼
//!   ┌────────────┐
//!   │ Visualizer  │  checks selection, resolves datasets
//!   └────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ builders  │  one per ChartKind → Figure
//!   └──────────┘
//!        │
//!        ├──▶ egui view (GUI)
//!        └──▶ export (PNG / SVG file)
//! ```
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::{Dataset, DatasetStore};
use crate::error::{Error, Result};

pub mod builders;
pub mod export;
pub mod figure;
pub mod stats;

pub use export::ExportOptions;
pub use figure::{label_at, CorrelationMatrix, Figure, Geometry, Panel, Trace};

// ---------------------------------------------------------------------------
// Chart kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChartKind {
    #[default]
    Line,
    Scatter,
    Bar,
    Histogram,
    Box,
    Heatmap,
}

impl ChartKind {
    pub const ALL: [ChartKind; 6] = [
        ChartKind::Line,
        ChartKind::Scatter,
        ChartKind::Bar,
        ChartKind::Histogram,
        ChartKind::Box,
        ChartKind::Heatmap,
    ];

    /// Human-readable name shown in the chart-type selector.
    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Line => "Line Plot",
            ChartKind::Scatter => "Scatter Plot",
            ChartKind::Bar => "Bar Chart",
            ChartKind::Histogram => "Histogram",
            ChartKind::Box => "Box Plot",
            ChartKind::Heatmap => "Heatmap",
        }
    }

    fn short_name(&self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Scatter => "scatter",
            ChartKind::Bar => "bar",
            ChartKind::Histogram => "histogram",
            ChartKind::Box => "box",
            ChartKind::Heatmap => "heatmap",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ChartKind {
    type Err = Error;

    /// Accepts the label (`"Box Plot"`) or the short name (`"box"`), any case.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        ChartKind::ALL
            .into_iter()
            .find(|k| k.label().eq_ignore_ascii_case(s) || k.short_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnsupportedVisualization(s.to_string()))
    }
}

/// Knobs the builders read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Fixed histogram bin count; Sturges' rule when unset.
    pub histogram_bins: Option<usize>,
}

// ---------------------------------------------------------------------------
// Visualizer – dispatch and the current figure
// ---------------------------------------------------------------------------

/// Owns the current figure. A failed render keeps the previous one.
#[derive(Debug, Default)]
pub struct Visualizer {
    options: BuildOptions,
    current: Option<Figure>,
}

impl Visualizer {
    pub fn new(options: BuildOptions) -> Self {
        Visualizer {
            options,
            current: None,
        }
    }

    /// Build `kind` from the selected datasets and keep it as the current figure.
    pub fn render<S: AsRef<str>>(
        &mut self,
        store: &DatasetStore,
        selected: &[S],
        kind: ChartKind,
    ) -> Result<&Figure> {
        if selected.is_empty() {
            return Err(Error::EmptySelection);
        }
        let datasets: Vec<&Dataset> = selected
            .iter()
            .map(|name| store.get(name.as_ref()))
            .collect::<Result<_>>()?;

        let figure = builders::build(kind, &datasets, &self.options)?;
        log::info!(
            "Rendered {} for {} dataset(s): {} panel(s), {} trace(s)",
            kind,
            datasets.len(),
            figure.panels.len(),
            figure.trace_count()
        );
        Ok(self.current.insert(figure))
    }

    /// Like [`render`](Self::render) with the kind given as text. An empty
    /// selection is reported before an unknown kind.
    pub fn render_named<S: AsRef<str>>(
        &mut self,
        store: &DatasetStore,
        selected: &[S],
        kind: &str,
    ) -> Result<&Figure> {
        if selected.is_empty() {
            return Err(Error::EmptySelection);
        }
        let kind: ChartKind = kind.parse()?;
        self.render(store, selected, kind)
    }

    pub fn current(&self) -> Option<&Figure> {
        self.current.as_ref()
    }

    /// Write the current figure to `path`; the extension picks the format.
    pub fn export(&self, path: &Path, options: &ExportOptions) -> Result<()> {
        let figure = self.current.as_ref().ok_or(Error::NoFigure)?;
        export::export(figure, path, options)
    }
}
