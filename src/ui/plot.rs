use std::collections::BTreeSet;
use std::f32::consts::TAU;

use chrono::{Datelike, NaiveDate};
use eframe::egui::{self, Color32, Pos2, RichText, Sense, Shape, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::color::{self, CategoryColors};
use crate::dashboard::Dashboard;

const CHART_HEIGHT: f32 = 360.0;

// ---------------------------------------------------------------------------
// Shared bits
// ---------------------------------------------------------------------------

/// Title in the dashboard's heading style.
pub fn chart_title(ui: &mut Ui, text: &str) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(
            RichText::new(text)
                .size(20.0)
                .strong()
                .color(color::HEADER_PURPLE),
        );
    });
}

/// Placeholder drawn instead of a chart when the view has no rows.
pub fn no_data(ui: &mut Ui, height: f32) {
    ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui: &mut Ui| {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(RichText::new("No data for this selection").italics().weak());
        });
    });
}

fn swatch(ui: &mut Ui, fill: Color32) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), Sense::hover());
    ui.painter().rect_filled(rect, 2.0, fill);
}

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

/// Distinct purchase count with the delta against the first row's total.
pub fn purchases_indicator(ui: &mut Ui, dashboard: &Dashboard) {
    chart_title(ui, "Total number of purchases");
    if dashboard.is_empty() {
        no_data(ui, 120.0);
        return;
    }
    let purchases = &dashboard.purchases;
    ui.vertical_centered(|ui: &mut Ui| {
        match purchases.delta {
            Some(delta) => {
                let (text, fill) = format_delta(delta);
                ui.label(RichText::new(text).size(22.0).color(fill));
            }
            None => {
                ui.label(RichText::new("no data").weak());
            }
        }
        ui.label(
            RichText::new(purchases.count.to_string())
                .size(56.0)
                .strong()
                .color(color::HEADER_PURPLE),
        );
        if let Some(reference) = purchases.reference {
            ui.label(RichText::new(format!("reference {reference:.2}")).small().weak());
        }
    });
}

/// Arrow plus magnitude, e.g. `▼96.0%`; the arrow carries the sign.
fn format_delta(delta: f64) -> (String, Color32) {
    if delta >= 0.0 {
        (format!("▲{:.1}%", delta * 100.0), color::INCREASING)
    } else {
        (format!("▼{:.1}%", delta.abs() * 100.0), color::DECREASING)
    }
}

/// Average rating as a bullet gauge over 0–10.
pub fn rating_gauge(ui: &mut Ui, dashboard: &Dashboard) {
    chart_title(ui, "Average rating");
    let Some(rating) = dashboard.average_rating else {
        no_data(ui, 120.0);
        return;
    };
    ui.add_space(12.0);
    ui.horizontal(|ui: &mut Ui| {
        ui.label(
            RichText::new(format!("{rating:.2}"))
                .size(40.0)
                .strong()
                .color(color::HEADER_PURPLE),
        );
        ui.add(
            egui::ProgressBar::new((rating / 10.0).clamp(0.0, 1.0) as f32)
                .fill(color::HONEY)
                .desired_width(ui.available_width()),
        );
    });
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new("0").small());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            ui.label(RichText::new("10").small());
        });
    });
}

// ---------------------------------------------------------------------------
// Weekly totals (line chart)
// ---------------------------------------------------------------------------

fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn x_to_label(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.format("%b %d, %Y").to_string())
        .unwrap_or_default()
}

/// Sum of `total` per ISO week, one line per city.
pub fn weekly_chart(ui: &mut Ui, dashboard: &Dashboard, colors: &CategoryColors) {
    chart_title(ui, "Weekly purchase total");
    if dashboard.weekly_totals.is_empty() {
        no_data(ui, CHART_HEIGHT);
        return;
    }

    let cities: BTreeSet<&str> = dashboard
        .weekly_totals
        .iter()
        .map(|w| w.city.as_str())
        .collect();

    Plot::new("weekly_totals")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Week")
        .y_axis_label("Total amount")
        .x_axis_formatter(|mark, _range| x_to_label(mark.value))
        .label_formatter(|name, point| {
            format!("{name}\nweek of {}\n{:.2}", x_to_label(point.x), point.y)
        })
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for city in cities {
                let points: Vec<[f64; 2]> = dashboard
                    .weekly_totals
                    .iter()
                    .filter(|w| w.city == city)
                    .map(|w| [date_to_x(w.week_start), w.total])
                    .collect();
                let fill = colors.city.color_for(city);

                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .name(city)
                        .color(fill)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(city)
                        .color(fill)
                        .radius(3.5),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Purchases by city and gender (grouped bars)
// ---------------------------------------------------------------------------

/// Row count per city, one bar per gender side by side.
pub fn city_gender_chart(ui: &mut Ui, dashboard: &Dashboard, colors: &CategoryColors) {
    chart_title(ui, "Purchases by gender and city");
    if dashboard.by_city_gender.is_empty() {
        no_data(ui, CHART_HEIGHT);
        return;
    }

    let cities: Vec<String> = dashboard
        .by_city_gender
        .iter()
        .map(|g| g.city.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let genders: BTreeSet<&str> = dashboard
        .by_city_gender
        .iter()
        .map(|g| g.gender.as_str())
        .collect();

    let bar_width = 0.8 / genders.len() as f64;
    let offset = |g_idx: usize| (g_idx as f64 - (genders.len() as f64 - 1.0) / 2.0) * bar_width;

    let charts: Vec<BarChart> = genders
        .iter()
        .enumerate()
        .map(|(g_idx, gender)| {
            let bars: Vec<Bar> = dashboard
                .by_city_gender
                .iter()
                .filter(|g| g.gender == *gender)
                .filter_map(|g| {
                    let c_idx = cities.iter().position(|c| *c == g.city)?;
                    Some(
                        Bar::new(c_idx as f64 + offset(g_idx), g.count as f64)
                            .width(bar_width)
                            .name(format!("{} · {}", g.city, g.gender)),
                    )
                })
                .collect();
            BarChart::new(bars)
                .name(*gender)
                .color(colors.gender.color_for(gender))
        })
        .collect();

    let labels = cities.clone();
    Plot::new("city_gender")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .y_axis_label("Purchases")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Product mix (donut)
// ---------------------------------------------------------------------------

const DONUT_HOLE: f32 = 0.2;
const DONUT_STEP: f32 = TAU / 120.0;

fn polar(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    center + radius * egui::vec2(angle.cos(), angle.sin())
}

/// Product-line share of the selection, drawn as a donut with a legend.
pub fn product_donut(ui: &mut Ui, dashboard: &Dashboard, colors: &CategoryColors) {
    chart_title(ui, "Product line breakdown");
    if dashboard.product_share.is_empty() {
        no_data(ui, CHART_HEIGHT);
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        let size = (ui.available_width() * 0.55).min(CHART_HEIGHT);
        let (response, painter) = ui.allocate_painter(egui::vec2(size, size), Sense::hover());
        let center = response.rect.center();
        let outer = size * 0.45;
        let inner = outer * DONUT_HOLE;

        // Start at twelve o'clock, run clockwise.
        let mut start = -TAU / 4.0;
        for share in &dashboard.product_share {
            let sweep = share.share as f32 * TAU;
            let fill = colors.product_line.color_for(&share.product_line);
            let steps = ((sweep / DONUT_STEP).ceil() as usize).max(1);
            for i in 0..steps {
                let a0 = start + sweep * i as f32 / steps as f32;
                let a1 = start + sweep * (i + 1) as f32 / steps as f32;
                painter.add(Shape::convex_polygon(
                    vec![
                        polar(center, inner, a0),
                        polar(center, outer, a0),
                        polar(center, outer, a1),
                        polar(center, inner, a1),
                    ],
                    fill,
                    Stroke::NONE,
                ));
            }
            start += sweep;
        }

        let hovered = response.hover_pos().and_then(|pos| {
            let d = pos - center;
            if !(inner..=outer).contains(&d.length()) {
                return None;
            }
            let angle = (d.y.atan2(d.x) + TAU / 4.0).rem_euclid(TAU);
            let mut acc = 0.0;
            dashboard.product_share.iter().find(|share| {
                acc += share.share as f32 * TAU;
                angle <= acc
            })
        });
        if let Some(share) = hovered {
            response.on_hover_text(format!(
                "{}\n{} purchases ({:.1}%)",
                share.product_line,
                share.count,
                share.share * 100.0
            ));
        }

        ui.vertical(|ui: &mut Ui| {
            for share in &dashboard.product_share {
                ui.horizontal(|ui: &mut Ui| {
                    swatch(ui, colors.product_line.color_for(&share.product_line));
                    ui.label(format!(
                        "{}  {:.1}%",
                        share.product_line,
                        share.share * 100.0
                    ));
                });
            }
        });
    });
}
