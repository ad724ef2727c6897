//! Data module - spreadsheet loading, calendar bucketing and caching

mod cache;
pub mod calendar;
mod loader;
pub mod schema;

pub use cache::TableCache;
pub use loader::{
    build_table, cell_text, normalize_headers, parse_date_cell, parse_spreadsheet, DataLoader,
    FileSource, HttpSource, LoaderError, TableSource,
};
