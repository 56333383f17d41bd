pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod loader;
pub mod model;
pub mod sort;
pub mod stats;
pub mod ui;
pub mod view;
