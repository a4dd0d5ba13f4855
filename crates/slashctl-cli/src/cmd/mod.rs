pub mod config;
pub mod list;
pub mod validate;
pub mod version;
