pub mod app;
pub mod cli;
pub mod config;
pub mod logging;
pub mod render;
pub mod utils;

pub use cli::Cli;
pub use config::CliConfig;
