//! Detailed table of the month's rows.

use crate::report::TableView;
use egui::{RichText, ScrollArea};

const MAX_TABLE_HEIGHT: f32 = 400.0;

pub fn show(ui: &mut egui::Ui, table: &TableView) {
    if table.is_empty() {
        ui.label(RichText::new("Nenhum registro neste mês.").size(12.0));
    }

    ScrollArea::both()
        .id_salt("detail_table_scroll")
        .max_height(MAX_TABLE_HEIGHT)
        .show(ui, |ui| {
            egui::Grid::new("detail_table")
                .striped(true)
                .min_col_width(60.0)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    for header in &table.headers {
                        ui.label(RichText::new(header).strong().size(11.0));
                    }
                    ui.end_row();

                    for row in &table.rows {
                        for cell in row {
                            ui.label(RichText::new(cell).size(11.0));
                        }
                        ui.end_row();
                    }
                });
        });
}
