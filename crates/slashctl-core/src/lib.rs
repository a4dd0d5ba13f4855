pub mod changelog;
pub mod command;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod io;
pub mod paths;
pub mod report;
pub mod types;
pub mod validator;
pub mod version;

pub use error::{Result, SlashError};
