use std::path::{Path, PathBuf};

use crate::data::filter::{self, FilterOutcome, FilterSpec, Operator};
use crate::data::DatasetStore;
use crate::error::Result;
use crate::settings::Settings;
use crate::viz::{ChartKind, Figure, Visualizer};

// ---------------------------------------------------------------------------
// Filter form
// ---------------------------------------------------------------------------

/// What the user has typed into the filter panel so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterForm {
    pub column: String,
    pub operator: Operator,
    pub value: String,
}

impl Default for FilterForm {
    fn default() -> Self {
        Self {
            column: String::new(),
            operator: Operator::Eq,
            value: String::new(),
        }
    }
}

impl FilterForm {
    pub fn to_spec(&self) -> FilterSpec {
        FilterSpec::new(&self.column, self.operator, &self.value)
    }
}

const VIZ_ERROR_PREFIX: &str = "Visualization error";

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering.
pub struct AppState {
    /// Every loaded dataset.
    pub store: DatasetStore,

    /// Builds and holds the current figure.
    pub visualizer: Visualizer,

    /// Dataset names ticked in the list, in the order they were ticked.
    pub selected: Vec<String>,

    /// Active chart type.
    pub chart_kind: ChartKind,

    /// Pending filter input.
    pub filter_form: FilterForm,

    pub settings: Settings,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            store: DatasetStore::new(),
            visualizer: Visualizer::new(settings.charts.clone()),
            selected: Vec::new(),
            chart_kind: ChartKind::default(),
            filter_form: FilterForm::default(),
            settings,
            status_message: None,
        }
    }

    /// Load each path. Failures are reported in the status line and do not
    /// stop the remaining files.
    pub fn load_paths<P: AsRef<Path>>(&mut self, paths: &[P]) -> Vec<String> {
        let mut loaded = Vec::new();
        let mut errors = Vec::new();
        for path in paths {
            let path = path.as_ref();
            match self.store.load(path) {
                Ok(name) => loaded.push(name),
                Err(e) => {
                    log::error!("Failed to load {}: {e}", path.display());
                    errors.push(format!("Failed to load dataset {}: {e}", path.display()));
                }
            }
        }

        // Offer the newest dataset's first column when nothing valid is picked.
        if let Some(name) = loaded.last() {
            let known = self.store.union_columns();
            if !known.contains(&self.filter_form.column) {
                if let Some(first) = self.store.columns(name).ok().and_then(|c| c.into_iter().next()) {
                    self.filter_form.column = first;
                }
            }
        }

        self.status_message = if errors.is_empty() {
            None
        } else {
            Some(errors.join("\n"))
        };
        if !loaded.is_empty() {
            self.refresh();
        }
        loaded
    }

    /// Tick or untick a dataset, then redraw.
    pub fn toggle_selection(&mut self, name: &str) {
        match self.selected.iter().position(|s| s == name) {
            Some(pos) => {
                self.selected.remove(pos);
            }
            None => self.selected.push(name.to_string()),
        }
        self.refresh();
    }

    pub fn set_chart_kind(&mut self, kind: ChartKind) {
        if self.chart_kind != kind {
            self.chart_kind = kind;
            self.refresh();
        }
    }

    /// Apply the filter form to every dataset, then redraw.
    pub fn apply_filter(&mut self) -> Result<Vec<FilterOutcome>> {
        let spec = self.filter_form.to_spec();
        match filter::apply(&mut self.store, &spec) {
            Ok(outcomes) => {
                self.status_message = None;
                self.refresh();
                Ok(outcomes)
            }
            Err(e) => {
                log::warn!("Filter {spec} rejected: {e}");
                self.status_message = Some(format!("Filter error: {e}"));
                Err(e)
            }
        }
    }

    /// Rebuild the figure from the current selection and chart kind.
    /// Does nothing while the selection is empty. A successful render clears
    /// an earlier visualization error from the status line.
    pub fn refresh(&mut self) {
        if self.selected.is_empty() {
            return;
        }
        match self.visualizer.render(&self.store, &self.selected, self.chart_kind) {
            Ok(_) => {
                let stale = self
                    .status_message
                    .as_deref()
                    .is_some_and(|m| m.starts_with(VIZ_ERROR_PREFIX));
                if stale {
                    self.status_message = None;
                }
            }
            Err(e) => {
                log::warn!("Visualization failed: {e}");
                self.status_message = Some(format!("{VIZ_ERROR_PREFIX}: {e}"));
            }
        }
    }

    pub fn figure(&self) -> Option<&Figure> {
        self.visualizer.current()
    }

    /// Export the current figure using the configured size.
    pub fn export(&mut self, path: &Path) -> Result<PathBuf> {
        match self.visualizer.export(path, &self.settings.export) {
            Ok(()) => {
                self.status_message = Some(format!("Exported to {}", path.display()));
                Ok(path.to_path_buf())
            }
            Err(e) => {
                log::error!("Export failed: {e}");
                self.status_message = Some(format!("Export error: {e}"));
                Err(e)
            }
        }
    }
}
