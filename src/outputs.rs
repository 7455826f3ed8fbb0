//! The six dashboard outputs as pure functions from inputs (and the dataset)
//! to renderable artifacts. Nothing here touches egui state; `ui::plot` and
//! `ui::table` draw what these functions return.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use eframe::egui::Color32;
use egui_plot::MarkerShape;
use rand::Rng;

use crate::color::{SpeciesPalette, marker_for};
use crate::data::filter::{SpeciesChoice, rows_in_species_set, rows_matching_choice};
use crate::data::model::{NumericColumn, PenguinDataset, Sex, Species};
use crate::error::RenderError;
use crate::stats::{self, Bin, BinScale};

/// Number of standard-normal values drawn for the synthetic histogram.
pub const SYNTHETIC_SAMPLE_SIZE: usize = 800;

/// Evaluation points for the KDE overlay.
const KDE_POINTS: usize = 200;

const FLIPPER_LABEL: &str = "Flipper Length (mm)";
const BODY_MASS_LABEL: &str = "Body Mass (g)";
const HOVER_FIELDS: [&str; 3] = ["island", "bill_length_mm", "bill_depth_mm"];

// ---------------------------------------------------------------------------
// Artifacts
// ---------------------------------------------------------------------------

/// The rendered result of one output slot.
#[derive(Debug, Clone)]
pub enum Artifact {
    Histogram(HistogramChart),
    Scatter(ScatterChart),
    Table(TableView),
}

#[derive(Debug, Clone)]
pub struct HistogramChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Bin count exactly as the input supplied it (0 = automatic).
    pub requested_bins: usize,
    pub bins: Vec<Bin>,
    /// Number of finite values that went into the bins.
    pub sample_count: usize,
    /// Optional KDE overlay, already scaled to the bar heights.
    pub density_curve: Option<Vec<[f64; 2]>>,
    pub fill: Color32,
    pub outline: Option<Color32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    /// Index into the dataset rows.
    pub row: usize,
    pub x: f64,
    pub y: f64,
    /// Extra `(field, value)` pairs shown on hover.
    pub hover: Vec<(&'static str, String)>,
}

/// All points sharing one colour (species) and one marker (sex).
#[derive(Debug, Clone)]
pub struct ScatterSeries {
    pub species: Species,
    pub sex: Option<Sex>,
    pub color: Color32,
    pub marker: MarkerShape,
    pub points: Vec<ScatterPoint>,
}

impl ScatterSeries {
    /// Legend name, e.g. `Gentoo, female`.
    pub fn name(&self) -> String {
        match self.sex {
            Some(sex) => format!("{}, {sex}", self.species),
            None => format!("{}, NA", self.species),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Rows passing the filter, including rows without plottable coordinates.
    pub rows: Vec<usize>,
    pub series: Vec<ScatterSeries>,
}

impl ScatterChart {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    /// Hover text for the point of series `name` nearest to `(x, y)`.
    pub fn hover_text(&self, name: &str, x: f64, y: f64) -> Option<String> {
        let series = self.series.iter().find(|s| s.name() == name)?;
        let nearest = series.points.iter().min_by(|a, b| {
            let da = (a.x - x).powi(2) + ((a.y - y) / 20.0).powi(2);
            let db = (b.x - x).powi(2) + ((b.y - y) / 20.0).powi(2);
            da.total_cmp(&db)
        })?;
        let mut text = format!(
            "{name} (row {})\n{FLIPPER_LABEL}: {}\n{BODY_MASS_LABEL}: {}",
            nearest.row, nearest.x, nearest.y
        );
        for (field, value) in &nearest.hover {
            text.push_str(&format!("\n{field}: {value}"));
        }
        Some(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Every row in one scrollable table.
    Table,
    /// Paginated grid, sortable by column.
    Grid { page_size: usize },
}

#[derive(Debug, Clone)]
pub struct TableView {
    pub kind: TableKind,
    pub dataset: Arc<PenguinDataset>,
}

// ---------------------------------------------------------------------------
// Output functions
// ---------------------------------------------------------------------------

/// Density histogram of freshly drawn standard-normal values.
pub fn plot_histogram<R: Rng + ?Sized>(bins: u32, rng: &mut R) -> HistogramChart {
    let values = stats::standard_normal(rng, SYNTHETIC_SAMPLE_SIZE);
    HistogramChart {
        title: "Frequency Distribution of Randomly Generated Data".to_string(),
        x_label: "Value".to_string(),
        y_label: "Density".to_string(),
        requested_bins: bins as usize,
        bins: stats::histogram(&values, bins as usize, BinScale::Density),
        sample_count: values.len(),
        density_curve: None,
        fill: Color32::from_rgb(255, 140, 0),
        outline: Some(Color32::BLACK),
    }
}

/// Flipper length vs body mass for one species (or all), fixed palette.
pub fn penguin_scatter(dataset: &PenguinDataset, choice: SpeciesChoice) -> ScatterChart {
    let rows = rows_matching_choice(dataset, choice);
    let series = build_series(dataset, &rows, &SpeciesPalette::fixed(), false);
    ScatterChart {
        title: format!("Penguin Flipper Length vs Body Mass by Species and Sex ({choice})"),
        x_label: FLIPPER_LABEL.to_string(),
        y_label: BODY_MASS_LABEL.to_string(),
        rows,
        series,
    }
}

/// The full dataset as a row-oriented table.
pub fn penguin_data_table(dataset: &Arc<PenguinDataset>) -> TableView {
    TableView {
        kind: TableKind::Table,
        dataset: Arc::clone(dataset),
    }
}

/// The full dataset as a paginated, sortable grid.
pub fn penguin_data_grid(dataset: &Arc<PenguinDataset>, page_size: usize) -> TableView {
    TableView {
        kind: TableKind::Grid {
            page_size: page_size.max(1),
        },
        dataset: Arc::clone(dataset),
    }
}

/// Count histogram of the selected attribute over the full dataset.
pub fn plotly_histogram(
    dataset: &PenguinDataset,
    attribute: &str,
    bins: u32,
) -> Result<HistogramChart, RenderError> {
    let values = attribute_values(dataset, attribute)?;
    Ok(HistogramChart {
        title: format!("Distribution of {attribute}"),
        x_label: attribute.to_string(),
        y_label: "count".to_string(),
        requested_bins: bins as usize,
        bins: stats::histogram(&values, bins as usize, BinScale::Count),
        sample_count: values.len(),
        density_curve: None,
        fill: Color32::from_rgb(99, 110, 250),
        outline: None,
    })
}

/// Count histogram of the selected attribute with a KDE overlay.
pub fn seaborn_histogram(
    dataset: &PenguinDataset,
    attribute: &str,
    bins: u32,
) -> Result<HistogramChart, RenderError> {
    let values = attribute_values(dataset, attribute)?;
    let hist = stats::histogram(&values, bins as usize, BinScale::Count);
    let bin_width = hist.first().map(Bin::width).unwrap_or(1.0);
    let curve = stats::gaussian_kde(&values, KDE_POINTS, values.len() as f64 * bin_width);
    Ok(HistogramChart {
        title: format!("Distribution of {attribute}"),
        x_label: attribute.to_string(),
        y_label: "Count".to_string(),
        requested_bins: bins as usize,
        bins: hist,
        sample_count: values.len(),
        density_curve: Some(curve),
        fill: Color32::from_rgb(76, 114, 176),
        outline: Some(Color32::WHITE),
    })
}

/// Flipper length vs body mass for the species in `selected`, with hover
/// details. An empty selection gives an empty chart.
pub fn plotly_scatterplot(dataset: &PenguinDataset, selected: &BTreeSet<Species>) -> ScatterChart {
    let rows = rows_in_species_set(dataset, selected);
    let series = build_series(dataset, &rows, &SpeciesPalette::generated(), true);
    ScatterChart {
        title: "Penguin Flipper Length vs Body Mass by Species and Sex".to_string(),
        x_label: FLIPPER_LABEL.to_string(),
        y_label: BODY_MASS_LABEL.to_string(),
        rows,
        series,
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn attribute_values(dataset: &PenguinDataset, attribute: &str) -> Result<Vec<f64>, RenderError> {
    let column = NumericColumn::from_name(attribute)
        .ok_or_else(|| RenderError::UnknownColumn(attribute.to_string()))?;
    let values = dataset.column_values(column);
    if values.is_empty() {
        return Err(RenderError::NoNumericValues(attribute.to_string()));
    }
    Ok(values)
}

/// Group rows into one series per (species, sex); rows missing either
/// coordinate are dropped.
fn build_series(
    dataset: &PenguinDataset,
    rows: &[usize],
    palette: &SpeciesPalette,
    with_hover: bool,
) -> Vec<ScatterSeries> {
    let mut groups: BTreeMap<(Species, Option<Sex>), Vec<ScatterPoint>> = BTreeMap::new();
    for &row in rows {
        let p = &dataset.rows[row];
        let (Some(x), Some(y)) = (
            p.value(NumericColumn::FlipperLength),
            p.value(NumericColumn::BodyMass),
        ) else {
            continue;
        };
        let hover = if with_hover {
            let fmt = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_else(|| "NA".into());
            vec![
                (HOVER_FIELDS[0], p.island.clone()),
                (HOVER_FIELDS[1], fmt(p.bill_length_mm)),
                (HOVER_FIELDS[2], fmt(p.bill_depth_mm)),
            ]
        } else {
            Vec::new()
        };
        groups
            .entry((p.species, p.sex))
            .or_default()
            .push(ScatterPoint { row, x, y, hover });
    }

    groups
        .into_iter()
        .map(|((species, sex), points)| ScatterSeries {
            species,
            sex,
            color: palette.color_for(species),
            marker: marker_for(sex),
            points,
        })
        .collect()
}
