use eframe::egui::{self, Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::error::RenderError;
use crate::outputs::{HistogramChart, ScatterChart};

const PLOT_HEIGHT: f32 = 300.0;

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Render a histogram artifact (bars plus optional density line).
pub fn histogram(ui: &mut Ui, id: &str, chart: &HistogramChart) {
    ui.label(RichText::new(&chart.title).strong());
    ui.label(format!(
        "{} values, {} bins (requested {})",
        chart.sample_count,
        chart.bins.len(),
        chart.requested_bins
    ));

    let bars: Vec<Bar> = chart
        .bins
        .iter()
        .map(|b| {
            let mut bar = Bar::new(b.center(), b.height)
                .width(b.width())
                .fill(chart.fill)
                .name(format!("[{:.2}, {:.2}): {}", b.lo, b.hi, b.count));
            if let Some(outline) = chart.outline {
                bar = bar.stroke(Stroke::new(1.0, outline));
            }
            bar
        })
        .collect();

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .x_axis_label(chart.x_label.clone())
        .y_axis_label(chart.y_label.clone())
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(chart.fill).name(&chart.x_label));
            if let Some(curve) = &chart.density_curve {
                let points: PlotPoints = curve.iter().copied().collect();
                plot_ui.line(
                    Line::new(points)
                        .name("kde")
                        .color(chart.fill.gamma_multiply(0.8))
                        .width(2.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

/// Render a scatter artifact, one series per species/sex pair.
pub fn scatter(ui: &mut Ui, id: &str, chart: &ScatterChart) {
    ui.label(RichText::new(&chart.title).strong());
    ui.label(format!(
        "{} rows, {} plotted",
        chart.rows.len(),
        chart.point_count()
    ));

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(chart.x_label.clone())
        .y_axis_label(chart.y_label.clone())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .label_formatter(|name, value| {
            if name.is_empty() {
                return String::new();
            }
            chart
                .hover_text(name, value.x, value.y)
                .unwrap_or_else(|| name.to_string())
        })
        .show(ui, |plot_ui| {
            for series in &chart.series {
                let points: PlotPoints = series.points.iter().map(|p| [p.x, p.y]).collect();
                plot_ui.points(
                    Points::new(points)
                        .name(series.name())
                        .color(series.color)
                        .shape(series.marker)
                        .filled(true)
                        .radius(3.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Placeholder for a failed output
// ---------------------------------------------------------------------------

pub fn render_error(ui: &mut Ui, err: &RenderError) {
    ui.allocate_ui(egui::vec2(ui.available_width(), PLOT_HEIGHT), |ui: &mut Ui| {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(RichText::new(format!("Unable to render: {err}")).color(Color32::RED));
        });
    });
}
