//! Dolphin Dashboard - Uber performance panel for a BYD Dolphin
//!
//! Desktop window showing the current month's earnings from the trip spreadsheet.

use anyhow::Context;
use dolphin_dashboard::config::{DashboardConfig, CONFIG_FILE};
use dolphin_dashboard::data::TableCache;
use dolphin_dashboard::gui::DashboardApp;
use dolphin_dashboard::logging;
use eframe::egui;
use std::path::Path;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let config = DashboardConfig::load(Path::new(CONFIG_FILE))
        .with_context(|| format!("Failed to load {}", CONFIG_FILE))?;
    logging::init_tracing(&config.log_level);

    let loader = config
        .build_loader()
        .context("Failed to create spreadsheet loader")?;
    let cache = Arc::new(TableCache::new(loader));

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("Painel Uber - BYD Dolphin"),
        ..Default::default()
    };

    eframe::run_native(
        "Painel Uber - BYD Dolphin",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config, cache)))),
    )
    .map_err(|e| anyhow::anyhow!("Dashboard window failed: {}", e))
}
