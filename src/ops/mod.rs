//! High-level operations.
//!
//! This module contains the implementation of catalyst commands.

pub mod add;
pub mod build;
pub mod check;
pub mod clean;
pub mod fetch;
pub mod generate;
pub mod hooks;
pub mod new;
pub mod run;

pub use add::{add, AddOptions};
pub use build::{build, BuildHost, BuildOptions};
pub use check::{check, CheckOptions};
pub use clean::{clean, CleanOptions};
pub use fetch::{fetch, FetchOptions};
pub use generate::{generate, GenerateOptions};
pub use hooks::run_hooks;
pub use new::{new_project, NewOptions};
pub use run::{run, test, RunOptions, TEST_PROFILE};
