//! Catalyst - a declarative, profile-layered build tool for C and C++
//!
//! This crate provides the core library functionality for catalyst:
//! profile composition, dependency resolution, and build-graph emission.

pub mod config;
pub mod graph;
pub mod ops;
pub mod resolver;
pub mod util;
pub mod workspace;

pub use config::{compose, ConfigError, Configuration};
pub use graph::{BackendKind, BuildGraph, Emitter, FeatureSet, GraphError};
pub use resolver::{DependencyError, ResolvedFlags, Resolver, SubBuild};
pub use util::Shell;
pub use workspace::Workspace;
