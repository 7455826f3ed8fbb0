use std::path::Path;
use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::data::filter::SpeciesChoice;
use crate::data::model::PenguinDataset;
use crate::reactive::{Inputs, ViewBinder};
use crate::ui::table::GridState;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Reactive outputs over the loaded dataset (None until a file loads).
    pub binder: Option<ViewBinder>,

    /// Sort column, direction and page of the data grid.
    pub grid: GridState,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            binder: None,
            grid: GridState::default(),
            status_message: None,
        }
    }

    /// Swap in a newly loaded dataset and rebind every output.
    ///
    /// Current input values carry over, except a species choice the new
    /// dataset does not contain, which falls back to "All".
    pub fn set_dataset(&mut self, dataset: PenguinDataset) {
        let mut inputs = match &self.binder {
            Some(b) => b.inputs().clone(),
            None => Inputs::from_config(&self.config),
        };
        if let SpeciesChoice::Only(s) = inputs.selected_species {
            if !dataset.species_counts.contains_key(&s) {
                inputs.selected_species = SpeciesChoice::All;
            }
        }

        if dataset.is_empty() {
            log::warn!("Loaded dataset has no rows");
        }
        self.binder = Some(ViewBinder::new(Arc::new(dataset), inputs, &self.config));
        self.grid = GridState::default();
        self.status_message = None;
    }

    /// Load `path` and bind it; failures are logged and shown in the status line.
    pub fn load_path(&mut self, path: &Path) {
        match crate::data::loader::load_file(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Species;
    use crate::data::model::fixtures::reference_dataset;

    #[test]
    fn test_set_dataset_keeps_inputs() {
        let mut state = AppState::new(DashboardConfig::default());
        state.set_dataset(reference_dataset());
        state
            .binder
            .as_mut()
            .unwrap()
            .update_inputs(|i| i.plotly_bin_count = 40);

        state.set_dataset(reference_dataset());
        assert_eq!(state.binder.as_ref().unwrap().inputs().plotly_bin_count, 40);
    }

    #[test]
    fn test_missing_species_choice_resets_to_all() {
        let mut state = AppState::new(DashboardConfig::default());
        state.set_dataset(reference_dataset());
        state
            .binder
            .as_mut()
            .unwrap()
            .update_inputs(|i| i.selected_species = SpeciesChoice::Only(Species::Chinstrap));

        let no_chinstrap: Vec<_> = reference_dataset()
            .rows
            .into_iter()
            .filter(|p| p.species != Species::Chinstrap)
            .collect();
        state.set_dataset(PenguinDataset::from_rows(no_chinstrap));
        assert_eq!(
            state.binder.as_ref().unwrap().inputs().selected_species,
            SpeciesChoice::All
        );
    }

    #[test]
    fn test_load_failure_sets_status() {
        let mut state = AppState::new(DashboardConfig::default());
        state.load_path(Path::new("does/not/exist.csv"));
        assert!(state.binder.is_none());
        assert!(state.status_message.unwrap().starts_with("Error:"));
    }
}
