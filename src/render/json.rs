//! JSON renderer: the declaration tree as nested objects.
//!
//! Every node is an object whose keys are its children; non-empty nodes
//! also carry a `meta` entry describing their kind and leaf.

use crate::error::Result;
use crate::model::{DeclNode, Leaf};
use crate::render::Renderer;
use crate::tree::RESERVED_SEGMENT;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, root: &DeclNode) -> Result<String> {
        let mut out = serde_json::to_string_pretty(&JsonNode { name: None, node: root })?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

/// A node with the segment name it is stored under. The root has none.
struct JsonNode<'a> {
    name: Option<&'a str>,
    node: &'a DeclNode,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Meta<'a> {
    kind: &'static str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    enum_values: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    enum_source_text: Option<&'a str>,
}

impl<'a> JsonNode<'a> {
    fn meta(&self) -> Option<Meta<'a>> {
        let node: &'a DeclNode = self.node;
        let name = self.name?;
        let kind = node.kind()?;
        let mut meta = Meta {
            kind: kind.as_str(),
            name,
            params: None,
            return_type: None,
            enum_values: None,
            enum_source_text: None,
        };
        match &node.leaf {
            Some(Leaf::Function {
                params,
                return_type,
                ..
            }) => {
                meta.params = Some(params.iter().map(ToString::to_string).collect());
                meta.return_type = return_type.as_deref();
            }
            Some(Leaf::Enum {
                values,
                source_text,
                ..
            }) => {
                meta.enum_values = Some(values.as_slice());
                meta.enum_source_text = Some(source_text.as_str());
            }
            None => {}
        }
        Some(meta)
    }
}

impl Serialize for JsonNode<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(meta) = self.meta() {
            map.serialize_entry(RESERVED_SEGMENT, &meta)?;
        }
        for (name, child) in &self.node.children {
            map.serialize_entry(
                name,
                &JsonNode {
                    name: Some(name.as_str()),
                    node: child,
                },
            )?;
        }
        map.end()
    }
}
