pub mod comparison;
pub mod config;
pub mod dashboard;
pub mod filters;
pub mod upload;
