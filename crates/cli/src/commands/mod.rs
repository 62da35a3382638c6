pub mod find;
pub mod show_config;
pub mod validate_config;
