use serde::{Deserialize, Serialize};

use super::{Figure, PLOT_ITEMS, PlotItem, plan_figures};
use crate::results::ResultStore;

/// One selected target and the legend text shown for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelRow {
    pub label: String,
    pub legend: String,
}

/// Selection state of the results plotting panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotPanel {
    plottables: Vec<String>,
    selected: PlotItem,
    rows: Vec<PanelRow>,
}

impl PlotPanel {
    /// Starts with nothing selected and the first plot item active.
    #[must_use]
    pub fn new(results: &ResultStore) -> Self {
        Self {
            plottables: results.plottable_labels(),
            selected: PLOT_ITEMS[0],
            rows: Vec::new(),
        }
    }

    /// Body labels, then point labels.
    #[must_use]
    pub fn plottables(&self) -> &[String] {
        &self.plottables
    }

    #[must_use]
    pub fn rows(&self) -> &[PanelRow] {
        &self.rows
    }

    #[must_use]
    pub fn selected(&self) -> PlotItem {
        self.selected
    }

    pub fn select(&mut self, item: PlotItem) {
        self.selected = item;
    }

    /// Adds the plottable at `index` with its label as legend.
    ///
    /// Returns `false` when the index is out of range or the label is
    /// already in the table.
    pub fn add(&mut self, index: usize) -> bool {
        let Some(label) = self.plottables.get(index) else {
            return false;
        };
        if self.rows.iter().any(|row| &row.label == label) {
            return false;
        }
        self.rows.push(PanelRow {
            label: label.clone(),
            legend: label.clone(),
        });
        true
    }

    pub fn remove(&mut self, row: usize) -> Option<PanelRow> {
        (row < self.rows.len()).then(|| self.rows.remove(row))
    }

    pub fn set_legend(&mut self, row: usize, legend: impl Into<String>) -> bool {
        match self.rows.get_mut(row) {
            Some(entry) => {
                entry.legend = legend.into();
                true
            }
            None => false,
        }
    }

    /// Figures for the selected item and the current rows.
    #[must_use]
    pub fn plot(&self, results: &ResultStore) -> Vec<Figure> {
        let targets: Vec<(String, String)> = self
            .rows
            .iter()
            .map(|row| (row.label.clone(), row.legend.clone()))
            .collect();
        plan_figures(self.selected, &targets, results)
    }
}
