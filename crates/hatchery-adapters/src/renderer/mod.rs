//! Template renderers.

mod jinja;

pub use jinja::JinjaRenderer;
