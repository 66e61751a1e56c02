pub mod action;
pub mod api;
pub mod cache;
pub mod catalog;
pub mod chart;
pub mod config;
pub mod effect;
pub mod logging;
pub mod matrix;
pub mod profile;
pub mod reducer;
pub mod state;
pub mod types;
pub mod ui;
