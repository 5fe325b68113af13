pub mod analyzer;
pub mod commands;
pub mod config;
pub mod error;
pub mod filters;
pub mod loader;
pub mod parser;
pub mod state;

pub use config::{load_config, AppConfig, DataSource};
pub use error::AppError;
pub use state::{AppState, SessionAccess};
