//! Dolphin Dashboard - monthly Uber earnings for a BYD Dolphin
//!
//! Downloads the trip spreadsheet, selects the current month, computes the
//! headline KPIs and renders them as cards, charts, a table and a CSV export.

pub mod charts;
pub mod config;
pub mod data;
pub mod export;
pub mod gui;
pub mod logging;
pub mod report;
pub mod stats;
