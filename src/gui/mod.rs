//! GUI module - User interface components

mod app;
mod chart_viewer;
mod kpi_cards;
mod table_view;

pub use app::DashboardApp;
pub use chart_viewer::ChartViewer;
