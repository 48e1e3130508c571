use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color;
use crate::export::{self, Snapshot};
use crate::state::{AppState, FilterEvent};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // Collected first, applied after the widgets so each change recomputes once.
    let mut events: Vec<FilterEvent> = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (dimension, values) in &state.options {
                let dimension = *dimension;
                let n_selected = state.selected_count(dimension);
                let header_text = if n_selected == 0 {
                    format!("{dimension}  (all)")
                } else {
                    format!("{dimension}  ({n_selected}/{})", values.len())
                };

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(dimension)
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            events.push(FilterEvent::Clear(dimension));
                        }

                        let colors = state.colors.get(dimension);
                        for value in values {
                            let text = RichText::new(value).color(colors.color_for(value));
                            let mut checked = state.is_selected(dimension, value);
                            if ui.checkbox(&mut checked, text).changed() {
                                events.push(FilterEvent::Toggle {
                                    dimension,
                                    value: value.clone(),
                                });
                            }
                        }
                    });
            }

            ui.separator();
            if ui.button("Reset filters").clicked() {
                events.push(FilterEvent::ClearAll);
            }
        });

    for event in events {
        log::debug!("Filter event: {event:?}");
        state.handle(event);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title bar with the file menu and row counts.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(
            RichText::new("Supermarket Dashboard")
                .size(30.0)
                .strong()
                .color(color::TITLE_TEXT),
        );
        ui.separator();

        egui::menu::bar(ui, |ui: &mut Ui| {
            ui.menu_button(RichText::new("File").color(color::TITLE_TEXT), |ui: &mut Ui| {
                if ui.button("Open…").clicked() {
                    open_file_dialog(state);
                    ui.close_menu();
                }
                if ui.button("Export summary…").clicked() {
                    export_dialog(state);
                    ui.close_menu();
                }
            });
        });

        ui.separator();
        ui.label(
            RichText::new(format!(
                "{} of {} rows · {}",
                state.dashboard.rows,
                state.table.len(),
                state.source.display()
            ))
            .color(color::TITLE_TEXT),
        );

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales data")
        .add_filter("Supported files", &["csv", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(table) => {
                log::info!(
                    "Opened {} with {} records",
                    path.display(),
                    table.len()
                );
                state.set_table(table, &path);
            }
            Err(e) => {
                // The previous table stays loaded.
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export dashboard summary")
        .add_filter("JSON", &["json"])
        .set_file_name("dashboard_summary.json")
        .save_file();

    if let Some(path) = file {
        let written = {
            let snapshot =
                Snapshot::new(&state.source, &state.filters, &state.dashboard, &state.colors);
            export::write_snapshot(&path, &snapshot)
        };
        match written {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Export failed: {e:#}");
                state.status_message = Some(format!("Export failed: {e:#}"));
            }
        }
    }
}
