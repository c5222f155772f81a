//! Command implementations

pub mod add;
pub mod build;
pub mod check;
pub mod clean;
pub mod completions;
pub mod fetch;
pub mod generate;
pub mod init;
pub mod new;
pub mod run;
