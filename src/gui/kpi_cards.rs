//! Metric cards row.

use crate::report::MetricCard;
use egui::RichText;

/// One column per card: small label on top, large value below.
pub fn show(ui: &mut egui::Ui, cards: &[MetricCard]) {
    if cards.is_empty() {
        return;
    }

    ui.columns(cards.len(), |columns| {
        for (ui, card) in columns.iter_mut().zip(cards) {
            egui::Frame::none()
                .fill(ui.visuals().widgets.noninteractive.bg_fill)
                .rounding(6.0)
                .inner_margin(10.0)
                .show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.label(RichText::new(card.label).size(13.0));
                    ui.label(RichText::new(&card.value).size(24.0).strong());
                });
        }
    });
}
