mod app;
mod config;
mod effects;
mod snapshot;
mod ui;

pub use app::run_app;
