mod app;
mod color;
mod config;
mod data;
mod error;
mod outputs;
mod reactive;
mod state;
mod stats;
mod ui;

use app::PenguinDashApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::from_args(std::env::args().skip(1));

    // Load the dataset eagerly, before the UI exists. A missing file is not
    // fatal: the user can still pick one via File → Open.
    let mut state = AppState::new(config.clone());
    state.load_path(&config.data_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    eframe::run_native(
        &config.title,
        options,
        Box::new(move |_cc| Ok(Box::new(PenguinDashApp::new(state)))),
    )
}
