//! Application ports (traits) for external dependencies.
//!
//! Driven ports are called by the services and implemented in
//! `hatchery-adapters`:
//!
//! - `Filesystem`: file operations
//! - `TemplateStore`: loading a template from a location
//! - `TemplateRenderer`: turning a template and parameters into a tree

pub mod output;

pub use output::{Filesystem, TemplateRenderer, TemplateStore};
