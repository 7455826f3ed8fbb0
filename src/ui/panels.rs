use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::SpeciesPalette;
use crate::data::filter::species_choices;
use crate::data::model::{NumericColumn, Species};
use crate::reactive::MAX_SLIDER_BINS;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – input widgets
// ---------------------------------------------------------------------------

/// Render the sidebar. Widgets edit a copy of the inputs; the binder is
/// handed the new snapshot and notifies whatever changed.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Sidebar");
    ui.separator();

    let github_url = state.config.github_url.clone();
    let Some(binder) = state.binder.as_mut() else {
        ui.label("No dataset loaded.");
        return;
    };

    let mut inputs = binder.inputs().clone();
    let choices = species_choices(binder.dataset());
    let palette = SpeciesPalette::generated();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Attribute for both histograms ----
            ui.strong("Select Attribute");
            egui::ComboBox::from_id_salt("selected_attribute")
                .selected_text(&inputs.selected_attribute)
                .show_ui(ui, |ui: &mut Ui| {
                    for col in NumericColumn::ALL {
                        ui.selectable_value(
                            &mut inputs.selected_attribute,
                            col.name().to_string(),
                            col.name(),
                        );
                    }
                });

            ui.strong("Plotly Histogram Bins");
            ui.add(egui::DragValue::new(&mut inputs.plotly_bin_count).range(1..=u32::MAX));

            ui.strong("Seaborn Histogram Bins");
            ui.add(egui::Slider::new(&mut inputs.seaborn_bin_count, 0..=MAX_SLIDER_BINS));

            // ---- Species checkbox group ----
            ui.strong("Filter Species");
            ui.horizontal_wrapped(|ui: &mut Ui| {
                for species in Species::ALL {
                    let mut checked = inputs.selected_species_list.contains(&species);
                    let text = RichText::new(species.as_str()).color(palette.color_for(species));
                    if ui.checkbox(&mut checked, text).changed() {
                        if checked {
                            inputs.selected_species_list.insert(species);
                        } else {
                            inputs.selected_species_list.remove(&species);
                        }
                    }
                }
            });

            ui.separator();
            ui.hyperlink_to("GitHub", &github_url);
            ui.add_space(4.0);

            ui.strong("Number of Bins");
            ui.add(egui::Slider::new(&mut inputs.selected_number_of_bins, 0..=MAX_SLIDER_BINS));

            ui.separator();
            ui.label(RichText::new("Penguin Plot Filters").small().strong());
            ui.strong("Select Species");
            egui::ComboBox::from_id_salt("selected_species")
                .selected_text(inputs.selected_species.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for choice in &choices {
                        ui.selectable_value(&mut inputs.selected_species, *choice, choice.label());
                    }
                });
        });

    binder.set_inputs(inputs);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(binder) = &state.binder {
            let ds = binder.dataset();
            let counts: Vec<String> = ds
                .species_counts
                .iter()
                .map(|(s, n)| format!("{s}: {n}"))
                .collect();
            ui.label(format!(
                "{} penguins on {} islands ({})",
                ds.len(),
                ds.islands.len(),
                counts.join(", ")
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open penguin data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
