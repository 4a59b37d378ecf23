pub mod app;
pub mod cli;
pub mod config;
pub mod effects;
pub mod logging;
pub mod producers;
pub mod surface;

pub use app::run;
