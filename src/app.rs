use eframe::egui::{self, Frame, RichText, ScrollArea, Stroke, Ui};

use crate::color;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, state: AppState) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());
        Self { state }
    }
}

/// Bordered lavender card around one chart.
fn card(ui: &mut Ui, add_contents: impl FnOnce(&mut Ui)) {
    Frame::default()
        .fill(color::BACKGROUND_LAVENDER)
        .stroke(Stroke::new(2.0, color::HEADER_PURPLE))
        .corner_radius(10.0)
        .inner_margin(6.0)
        .show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());
            add_contents(ui);
        });
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title and file menu ----
        egui::TopBottomPanel::top("top_bar")
            .frame(
                Frame::default()
                    .fill(color::HEADER_PURPLE)
                    .inner_margin(10.0),
            )
            .show(ctx, |ui| {
                panels::top_bar(ui, &mut self.state);
            });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: indicators and charts ----
        egui::CentralPanel::default()
            .frame(
                Frame::default()
                    .fill(color::BACKGROUND_LAVENDER)
                    .inner_margin(8.0),
            )
            .show(ctx, |ui| {
                let state = &self.state;
                ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui: &mut Ui| {
                        ui.columns(2, |cols| {
                            card(&mut cols[0], |ui| plot::purchases_indicator(ui, &state.dashboard));
                            card(&mut cols[1], |ui| plot::rating_gauge(ui, &state.dashboard));
                        });
                        ui.add_space(10.0);

                        card(ui, |ui| plot::weekly_chart(ui, &state.dashboard, &state.colors));
                        ui.add_space(10.0);

                        ui.columns(2, |cols| {
                            card(&mut cols[0], |ui| {
                                plot::city_gender_chart(ui, &state.dashboard, &state.colors)
                            });
                            card(&mut cols[1], |ui| {
                                plot::product_donut(ui, &state.dashboard, &state.colors)
                            });
                        });

                        ui.add_space(20.0);
                        ui.vertical_centered(|ui: &mut Ui| {
                            ui.label(
                                RichText::new("Information")
                                    .size(18.0)
                                    .strong()
                                    .color(color::HEADER_PURPLE),
                            );
                            ui.label("Built from a fictitious supermarket sales dataset.");
                        });
                    });
            });
    }
}
