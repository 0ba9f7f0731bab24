//! Renderers for the declaration tree, dispatched by format name.

pub mod dts;
pub mod json;

use crate::error::{Error, Result};
use crate::model::DeclNode;

/// Trait for rendering a finished declaration tree into one output format.
pub trait Renderer {
    fn render(&self, root: &DeclNode) -> Result<String>;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "dts" | "d.ts" | "ts" => Ok(Box::new(dts::DtsRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(Error::UnknownFormat(format.to_string())),
    }
}
