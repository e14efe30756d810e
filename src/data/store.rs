use std::collections::BTreeMap;
use std::path::Path;

use super::loader;
use super::model::Dataset;
use crate::error::{Error, Result};

/// In-memory datasets keyed by name (case-sensitive).
#[derive(Debug, Default, Clone)]
pub struct DatasetStore {
    datasets: BTreeMap<String, Dataset>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a file and register it under its file stem, replacing any
    /// dataset of the same name. Nothing is registered when loading fails.
    pub fn load(&mut self, path: &Path) -> Result<String> {
        let dataset = loader::load_file(path)?;
        log::info!(
            "Loaded '{}' from {} ({} rows, {} columns)",
            dataset.name,
            path.display(),
            dataset.len(),
            dataset.columns.len()
        );
        Ok(self.insert(dataset))
    }

    /// Register a dataset under its own name and return that name.
    pub fn insert(&mut self, dataset: Dataset) -> String {
        let name = dataset.name.clone();
        if self.datasets.insert(name.clone(), dataset).is_some() {
            log::debug!("Replaced existing dataset '{name}'");
        }
        name
    }

    pub fn get(&self, name: &str) -> Result<&Dataset> {
        self.datasets
            .get(name)
            .ok_or_else(|| Error::UnknownDataset(name.to_string()))
    }

    /// Column names of a dataset, in file order.
    pub fn columns(&self, name: &str) -> Result<Vec<String>> {
        Ok(self.get(name)?.column_names())
    }

    /// Every column name seen in any dataset, first occurrence order.
    pub fn union_columns(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for ds in self.datasets.values() {
            for c in &ds.columns {
                if !out.contains(&c.name) {
                    out.push(c.name.clone());
                }
            }
        }
        out
    }

    pub fn names(&self) -> Vec<String> {
        self.datasets.keys().cloned().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.datasets.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Dataset)> {
        self.datasets.iter()
    }

    /// Swap in a new version of an existing dataset.
    pub(crate) fn replace(&mut self, name: &str, dataset: Dataset) {
        if let Some(slot) = self.datasets.get_mut(name) {
            *slot = dataset;
        }
    }
}
