mod app;
mod color;
mod dashboard;
mod data;
mod export;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use app::DashboardApp;
use eframe::egui;
use state::AppState;

const DEFAULT_DATA_FILE: &str = "supermarket_sales.csv";

fn main() -> Result<()> {
    env_logger::init();

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

    // A dataset that fails to load never reaches the window.
    let table = data::loader::load_file(&path)
        .with_context(|| format!("loading {}", path.display()))?;
    log::info!(
        "{} cities, {} genders, {} product lines",
        table.unique_values(data::model::Dimension::City).len(),
        table.unique_values(data::model::Dimension::Gender).len(),
        table.unique_values(data::model::Dimension::ProductLine).len()
    );
    let state = AppState::new(table, path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Supermarket Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, state)))),
    )
    .map_err(|e| anyhow!("running the dashboard window: {e}"))
}
