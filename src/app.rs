use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::outputs::Artifact;
use crate::reactive::OutputId;
use crate::state::AppState;
use crate::ui::table::GridState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PenguinDashApp {
    pub state: AppState,
}

impl PenguinDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for PenguinDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: inputs ----
        egui::SidePanel::left("sidebar")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // Recompute whatever the sidebar invalidated before drawing.
        if let Some(binder) = self.state.binder.as_mut() {
            binder.refresh();
        }

        // ---- Central panel: cards ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let AppState { binder, grid, .. } = &mut self.state;
            let Some(binder) = binder.as_ref() else {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("Open a file to view penguins  (File → Open…)");
                });
                return;
            };

            ScrollArea::vertical().show(ui, |ui: &mut Ui| {
                ui.columns(2, |cols| {
                    card(
                        &mut cols[0],
                        "Random Data Histogram",
                        binder,
                        OutputId::PlotHistogram,
                        grid,
                    );
                    card(
                        &mut cols[1],
                        "Penguin Scatterplot",
                        binder,
                        OutputId::PenguinScatter,
                        grid,
                    );
                });
                ui.columns(2, |cols| {
                    card(
                        &mut cols[0],
                        "Penguin Data Table",
                        binder,
                        OutputId::PenguinDataTable,
                        grid,
                    );
                    card(
                        &mut cols[1],
                        "Penguin Data Grid",
                        binder,
                        OutputId::PenguinDataGrid,
                        grid,
                    );
                });
                ui.columns(3, |cols| {
                    card(
                        &mut cols[0],
                        "Plotly Histogram: All Species",
                        binder,
                        OutputId::PlotlyHistogram,
                        grid,
                    );
                    card(
                        &mut cols[1],
                        "Seaborn Histogram: All Species",
                        binder,
                        OutputId::SeabornHistogram,
                        grid,
                    );
                    card(
                        &mut cols[2],
                        "Plotly Scatterplot: Species",
                        binder,
                        OutputId::PlotlyScatterplot,
                        grid,
                    );
                });
            });
        });
    }
}

/// One card: a header and the output's artifact (or its error placeholder).
fn card(
    ui: &mut Ui,
    header: &str,
    binder: &crate::reactive::ViewBinder,
    output: OutputId,
    grid: &mut GridState,
) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new(header).heading()).on_hover_text(format!(
            "{} recomputed {} times",
            output.name(),
            binder.recompute_count(output)
        ));
        ui.separator();
        match binder.artifact(output) {
            Some(Ok(Artifact::Histogram(chart))) => plot::histogram(ui, output.name(), chart),
            Some(Ok(Artifact::Scatter(chart))) => plot::scatter(ui, output.name(), chart),
            Some(Ok(Artifact::Table(view))) => table::table_view(ui, output.name(), view, grid),
            Some(Err(e)) => plot::render_error(ui, e),
            None => {
                ui.spinner();
            }
        }
    });
}
