//! Rendering: schema tree to JSON Schema document.
//!
//! Key order in the output is part of the contract, not an accident.
//! serde_json's `preserve_order` feature makes `Map` insertion-ordered,
//! so each match arm below spells out its keys in the exact order the
//! document must carry them:
//!
//! - scalars: `type`
//! - arrays: `type`, `items`
//! - objects: `type`, `properties`, `required` (omitted when empty)
//! - nullable: merged `type` array first, then the inner node's
//!   remaining keys in their original order
//! - described/defaulted nodes: the inner node's keys, then
//!   `description` / `default` appended last
//!
//! Equal trees therefore render to byte-identical text.

use serde_json::{Map, Value, json};

use crate::node::{ObjectField, SchemaNode};

const DRAFT_URL: &str = "http://json-schema.org/draft-07/schema#";

// ------------------------------ Entry points ------------------------------ //

/// Render the JSON Schema document for a schema tree.
pub fn render(node: &SchemaNode) -> Value {
    Value::Object(render_entries(node))
}

/// Standalone-file form of [`render`]: the same document with a
/// `$schema` draft identifier prepended.
pub fn to_document(node: &SchemaNode) -> Value {
    let mut out = Map::new();
    out.insert("$schema".to_string(), json!(DRAFT_URL));
    for (key, value) in render_entries(node) {
        out.insert(key, value);
    }
    Value::Object(out)
}

// ------------------------------ Node emission ------------------------------ //

fn render_entries(node: &SchemaNode) -> Map<String, Value> {
    let mut out = Map::new();
    match node {
        SchemaNode::String => {
            out.insert("type".to_string(), json!("string"));
        }
        SchemaNode::Integer => {
            out.insert("type".to_string(), json!("integer"));
        }
        SchemaNode::Number => {
            out.insert("type".to_string(), json!("number"));
        }
        SchemaNode::Boolean => {
            out.insert("type".to_string(), json!("boolean"));
        }
        SchemaNode::Array(items) => {
            out.insert("type".to_string(), json!("array"));
            out.insert("items".to_string(), render(items));
        }
        SchemaNode::Nullable(inner) => match type_name(inner) {
            // The common case merges into a two-element `type` array and
            // keeps the inner node's other keys (`items`, `properties`,
            // `enum`, ...) behind it.
            Some(name) => {
                out.insert("type".to_string(), json!([name, "null"]));
                for (key, value) in render_entries(inner) {
                    if key != "type" {
                        out.insert(key, value);
                    }
                }
            }
            // Shapes with no single type name (nested nullable, unions)
            // fall back to an explicit alternative with null.
            None => {
                out.insert(
                    "anyOf".to_string(),
                    json!([render(inner), { "type": "null" }]),
                );
            }
        },
        SchemaNode::Object(fields) => {
            out.insert("type".to_string(), json!("object"));
            out.insert("properties".to_string(), render_properties(fields));
            let required: Vec<Value> = fields
                .iter()
                .filter(|field| field.required)
                .map(|field| Value::from(field.name.clone()))
                .collect();
            if !required.is_empty() {
                out.insert("required".to_string(), Value::Array(required));
            }
        }
        SchemaNode::Enum(values) => {
            out.insert("type".to_string(), json!("string"));
            out.insert("enum".to_string(), json!(values));
        }
        SchemaNode::Const(value) => {
            out.insert("type".to_string(), json!("string"));
            out.insert("const".to_string(), json!(value));
        }
        SchemaNode::Description { inner, text } => {
            out = render_entries(inner);
            out.insert("description".to_string(), json!(text));
        }
        SchemaNode::Default { inner, value } => {
            out = render_entries(inner);
            out.insert("default".to_string(), value.clone());
        }
        SchemaNode::Combiner { keyword, variants } => {
            let rendered: Vec<Value> = variants.iter().map(render).collect();
            out.insert(keyword.keyword().to_string(), Value::Array(rendered));
        }
    }
    out
}

fn render_properties(fields: &[ObjectField]) -> Value {
    let mut properties = Map::new();
    for field in fields {
        properties.insert(field.name.clone(), render(&field.schema));
    }
    Value::Object(properties)
}

/// The single scalar type name a node would emit, for the nullable merge
/// rule. `None` for shapes JSON Schema cannot express as one entry of a
/// `type` array: nested nullables and combiners.
fn type_name(node: &SchemaNode) -> Option<&'static str> {
    match node {
        SchemaNode::String | SchemaNode::Enum(_) | SchemaNode::Const(_) => Some("string"),
        SchemaNode::Integer => Some("integer"),
        SchemaNode::Number => Some("number"),
        SchemaNode::Boolean => Some("boolean"),
        SchemaNode::Array(_) => Some("array"),
        SchemaNode::Object(_) => Some("object"),
        SchemaNode::Description { inner, .. } | SchemaNode::Default { inner, .. } => {
            type_name(inner)
        }
        SchemaNode::Nullable(_) | SchemaNode::Combiner { .. } => None,
    }
}

// ------------------------------ Tests ------------------------------ //
