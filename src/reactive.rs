//! Explicit reactivity for the dashboard outputs.
//!
//! Each [`OutputId`] declares the [`InputId`]s it reads. Changing an input
//! through [`ViewBinder::set_inputs`] (or [`ViewBinder::update_inputs`])
//! pushes a notification that marks exactly those outputs dirty;
//! [`ViewBinder::refresh`] recomputes the dirty ones from scratch and caches
//! the result until the next relevant change.
//!
//! ```text
//!   set_inputs ──diff──▶ notify(InputId) ──▶ dirty: {OutputId}
//!                                                │
//!                                  refresh() ◀───┘
//!                                      │
//!                                      ▼
//!                   artifacts: OutputId → Result<Artifact, RenderError>
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::DashboardConfig;
use crate::data::filter::SpeciesChoice;
use crate::data::model::{NumericColumn, PenguinDataset, Species};
use crate::error::RenderError;
use crate::outputs::{self, Artifact};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InputId {
    SelectedAttribute,
    PlotlyBinCount,
    SeabornBinCount,
    SelectedSpeciesList,
    SelectedNumberOfBins,
    SelectedSpecies,
}

impl InputId {
    pub fn name(&self) -> &'static str {
        match self {
            InputId::SelectedAttribute => "selected_attribute",
            InputId::PlotlyBinCount => "plotly_bin_count",
            InputId::SeabornBinCount => "seaborn_bin_count",
            InputId::SelectedSpeciesList => "selected_species_list",
            InputId::SelectedNumberOfBins => "selected_number_of_bins",
            InputId::SelectedSpecies => "selected_species",
        }
    }
}

/// Upper bound of the two slider inputs.
pub const MAX_SLIDER_BINS: u32 = 100;

/// Snapshot of every input value.
#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    /// Column name for the attribute histograms. Kept as text so a name
    /// that is not a numeric column fails only those outputs.
    pub selected_attribute: String,
    /// Requested bins for the plotly-style histogram (>= 1).
    pub plotly_bin_count: u32,
    /// Requested bins for the seaborn-style histogram (0..=100, 0 = auto).
    pub seaborn_bin_count: u32,
    pub selected_species_list: BTreeSet<Species>,
    /// Bins for the synthetic-data histogram (0..=100, 0 = auto).
    pub selected_number_of_bins: u32,
    pub selected_species: SpeciesChoice,
}

impl Inputs {
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            selected_attribute: NumericColumn::BillLength.name().to_string(),
            plotly_bin_count: config.default_bins.max(1),
            seaborn_bin_count: config.default_bins.min(MAX_SLIDER_BINS),
            selected_species_list: Species::ALL.into_iter().collect(),
            selected_number_of_bins: config.default_bins.min(MAX_SLIDER_BINS),
            selected_species: SpeciesChoice::All,
        }
    }

    /// Inputs whose value differs between `self` and `other`.
    pub fn changed(&self, other: &Inputs) -> Vec<InputId> {
        let mut changed = Vec::new();
        if self.selected_attribute != other.selected_attribute {
            changed.push(InputId::SelectedAttribute);
        }
        if self.plotly_bin_count != other.plotly_bin_count {
            changed.push(InputId::PlotlyBinCount);
        }
        if self.seaborn_bin_count != other.seaborn_bin_count {
            changed.push(InputId::SeabornBinCount);
        }
        if self.selected_species_list != other.selected_species_list {
            changed.push(InputId::SelectedSpeciesList);
        }
        if self.selected_number_of_bins != other.selected_number_of_bins {
            changed.push(InputId::SelectedNumberOfBins);
        }
        if self.selected_species != other.selected_species {
            changed.push(InputId::SelectedSpecies);
        }
        changed
    }
}

// ---------------------------------------------------------------------------
// Outputs and their declared dependencies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutputId {
    PlotHistogram,
    PenguinScatter,
    PenguinDataTable,
    PenguinDataGrid,
    PlotlyHistogram,
    SeabornHistogram,
    PlotlyScatterplot,
}

impl OutputId {
    pub const ALL: [OutputId; 7] = [
        OutputId::PlotHistogram,
        OutputId::PenguinScatter,
        OutputId::PenguinDataTable,
        OutputId::PenguinDataGrid,
        OutputId::PlotlyHistogram,
        OutputId::SeabornHistogram,
        OutputId::PlotlyScatterplot,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OutputId::PlotHistogram => "plot_histogram",
            OutputId::PenguinScatter => "penguin_scatter",
            OutputId::PenguinDataTable => "penguin_data_table",
            OutputId::PenguinDataGrid => "penguin_data_grid",
            OutputId::PlotlyHistogram => "plotly_histogram",
            OutputId::SeabornHistogram => "seaborn_histogram",
            OutputId::PlotlyScatterplot => "plotly_scatterplot",
        }
    }

    /// The inputs this output reads. The tables read none and are computed
    /// once per dataset.
    pub fn reads(&self) -> &'static [InputId] {
        match self {
            OutputId::PlotHistogram => &[InputId::SelectedNumberOfBins],
            OutputId::PenguinScatter => &[InputId::SelectedSpecies],
            OutputId::PenguinDataTable | OutputId::PenguinDataGrid => &[],
            OutputId::PlotlyHistogram => &[InputId::SelectedAttribute, InputId::PlotlyBinCount],
            OutputId::SeabornHistogram => &[InputId::SelectedAttribute, InputId::SeabornBinCount],
            OutputId::PlotlyScatterplot => &[InputId::SelectedSpeciesList],
        }
    }

    /// Outputs that must be recomputed when `input` changes.
    pub fn dependents(input: InputId) -> impl Iterator<Item = OutputId> {
        OutputId::ALL
            .into_iter()
            .filter(move |out| out.reads().contains(&input))
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// ViewBinder
// ---------------------------------------------------------------------------

/// Holds the immutable dataset, the current inputs and the cached artifact
/// of every output.
pub struct ViewBinder {
    dataset: Arc<PenguinDataset>,
    inputs: Inputs,
    rng: StdRng,
    grid_page_size: usize,
    artifacts: BTreeMap<OutputId, Result<Artifact, RenderError>>,
    dirty: BTreeSet<OutputId>,
    recomputations: BTreeMap<OutputId, u64>,
}

impl ViewBinder {
    /// Bind `dataset` and compute every output once.
    pub fn new(dataset: Arc<PenguinDataset>, inputs: Inputs, config: &DashboardConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut binder = ViewBinder {
            dataset,
            inputs,
            rng,
            grid_page_size: config.grid_page_size,
            artifacts: BTreeMap::new(),
            dirty: OutputId::ALL.into_iter().collect(),
            recomputations: BTreeMap::new(),
        };
        binder.refresh();
        log::info!(
            "Bound {} outputs to a dataset of {} rows",
            OutputId::ALL.len(),
            binder.dataset.len()
        );
        binder
    }

    pub fn dataset(&self) -> &Arc<PenguinDataset> {
        &self.dataset
    }

    pub fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    /// Replace the input snapshot, notifying every input that changed.
    pub fn set_inputs(&mut self, new: Inputs) {
        let changed = self.inputs.changed(&new);
        self.inputs = new;
        for input in changed {
            self.notify(input);
        }
    }

    /// Edit the inputs in place, then notify the ones that changed.
    pub fn update_inputs(&mut self, f: impl FnOnce(&mut Inputs)) {
        let mut new = self.inputs.clone();
        f(&mut new);
        self.set_inputs(new);
    }

    /// Mark every output that reads `input` as dirty.
    pub fn notify(&mut self, input: InputId) {
        for out in OutputId::dependents(input) {
            log::debug!("{} changed, invalidating {out}", input.name());
            self.dirty.insert(out);
        }
    }

    /// Recompute every dirty output. Returns the outputs that were recomputed.
    pub fn refresh(&mut self) -> Vec<OutputId> {
        let dirty = std::mem::take(&mut self.dirty);
        for &out in &dirty {
            let result = self.render(out);
            match &result {
                Ok(_) => log::debug!("Recomputed {out}"),
                Err(e) => log::warn!("Output {out} failed to render: {e}"),
            }
            self.artifacts.insert(out, result);
            *self.recomputations.entry(out).or_insert(0) += 1;
        }
        dirty.into_iter().collect()
    }

    /// Cached artifact of `output`, as of the last [`refresh`](Self::refresh).
    pub fn artifact(&self, output: OutputId) -> Option<&Result<Artifact, RenderError>> {
        self.artifacts.get(&output)
    }

    /// How many times `output` has been computed.
    pub fn recompute_count(&self, output: OutputId) -> u64 {
        self.recomputations.get(&output).copied().unwrap_or(0)
    }

    fn render(&mut self, output: OutputId) -> Result<Artifact, RenderError> {
        let ds = &self.dataset;
        let inputs = &self.inputs;
        Ok(match output {
            OutputId::PlotHistogram => Artifact::Histogram(outputs::plot_histogram(
                inputs.selected_number_of_bins,
                &mut self.rng,
            )),
            OutputId::PenguinScatter => {
                Artifact::Scatter(outputs::penguin_scatter(ds, inputs.selected_species))
            }
            OutputId::PenguinDataTable => Artifact::Table(outputs::penguin_data_table(ds)),
            OutputId::PenguinDataGrid => {
                Artifact::Table(outputs::penguin_data_grid(ds, self.grid_page_size))
            }
            OutputId::PlotlyHistogram => Artifact::Histogram(outputs::plotly_histogram(
                ds,
                &inputs.selected_attribute,
                inputs.plotly_bin_count,
            )?),
            OutputId::SeabornHistogram => Artifact::Histogram(outputs::seaborn_histogram(
                ds,
                &inputs.selected_attribute,
                inputs.seaborn_bin_count,
            )?),
            OutputId::PlotlyScatterplot => Artifact::Scatter(outputs::plotly_scatterplot(
                ds,
                &inputs.selected_species_list,
            )),
        })
    }
}
