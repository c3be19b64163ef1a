pub mod config;
pub mod error;
pub mod history;
pub mod jobs;
pub mod preset;
pub mod style;
pub mod stylize;
