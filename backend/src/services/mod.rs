pub mod encoding;
pub mod history_store;
pub mod job_manager;
pub mod presets;
pub mod request_builder;
pub mod resolver;
pub mod session_store;
pub mod store;
pub mod style_refs;
pub mod stylize_client;
