//! Chart Viewer Widget
//! Stacks the dashboard charts as cards; skipped optional charts show their notice instead.

use crate::charts::{ChartOutcome, ChartPlotter, ChartSpec};
use crate::report::Dashboard;
use egui::{Color32, RichText};

const CHART_SPACING: f32 = 15.0;
const NOTICE_COLOR: Color32 = Color32::from_rgb(243, 156, 18); // Orange
const CARD_BORDER: Color32 = Color32::from_rgb(100, 149, 237);

/// Vertical list of chart cards.
#[derive(Default)]
pub struct ChartViewer;

impl ChartViewer {
    pub fn new() -> Self {
        Self
    }

    pub fn show(&self, ui: &mut egui::Ui, dashboard: &Dashboard) {
        match &dashboard.earnings_chart {
            Some(spec) => Self::draw_chart_card(ui, spec),
            None => {
                ui.label(
                    RichText::new(format!("Nenhuma viagem registrada em {}.", dashboard.month))
                        .size(14.0)
                        .color(Color32::GRAY),
                );
            }
        }
        ui.add_space(CHART_SPACING);

        for outcome in &dashboard.optional_charts {
            match outcome {
                ChartOutcome::Ready(spec) => Self::draw_chart_card(ui, spec),
                ChartOutcome::Skipped { title, notice, .. } => {
                    Self::draw_notice(ui, title, notice)
                }
            }
            ui.add_space(CHART_SPACING);
        }
    }

    /// Draw a single chart card
    fn draw_chart_card(ui: &mut egui::Ui, spec: &ChartSpec) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.5, CARD_BORDER))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new(spec.title()).size(18.0).strong());
                ui.add_space(8.0);
                ChartPlotter::draw_chart(ui, spec);
            });
    }

    fn draw_notice(ui: &mut egui::Ui, title: &str, notice: &str) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.5, NOTICE_COLOR))
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new(title).size(14.0).strong());
                ui.label(RichText::new(format!("⚠ {}", notice)).color(NOTICE_COLOR));
            });
    }
}
