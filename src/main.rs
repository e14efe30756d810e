mod app;
mod ui;

use std::path::PathBuf;

use app::RustyLensApp;
use eframe::egui;
use rusty_lens::settings::Settings;
use rusty_lens::state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let mut state = AppState::new(Settings::from_env());

    // Files named on the command line are loaded before the window opens.
    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if !paths.is_empty() {
        state.load_paths(&paths);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Lens – Data Visualizer",
        options,
        Box::new(|_cc| Ok(Box::new(RustyLensApp::new(state)))),
    )
}
