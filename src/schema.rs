//! The paired artifact: one schema tree and one decoder for the same
//! shape, constructed together so they cannot drift apart.

use std::fmt;

use serde_json::Value;

use crate::decode::{self, Decoder};
use crate::error::DecodeError;
use crate::node::SchemaNode;
use crate::render;

// ------------------------------ JsonSchema ------------------------------ //

/// A data-shape declaration.
///
/// Holds the schema tree for documentation and the decoder for typed
/// reads, built by the same constructor call. There is no way to re-pair
/// a tree with a different decoder; the only constructors are the
/// functions in this crate, and every one of them grows both sides in
/// lockstep.
///
/// Values are immutable, cheap to clone, and safe to share across
/// threads. Build a schema once (a `Lazy` static works well) and reuse
/// it for any number of [`decode`](JsonSchema::decode) and
/// [`to_json`](JsonSchema::to_json) calls.
pub struct JsonSchema<T> {
    node: SchemaNode,
    decoder: Decoder<T>,
}

// Not derived: neither impl should require anything of `T`.
impl<T> Clone for JsonSchema<T> {
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone(),
            decoder: self.decoder.clone(),
        }
    }
}

impl<T> fmt::Debug for JsonSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchema")
            .field("node", &self.node)
            .field("decoder", &self.decoder)
            .finish()
    }
}

impl<T: 'static> JsonSchema<T> {
    pub(crate) fn from_parts(node: SchemaNode, decoder: Decoder<T>) -> Self {
        Self { node, decoder }
    }

    pub(crate) fn into_parts(self) -> (SchemaNode, Decoder<T>) {
        (self.node, self.decoder)
    }

    /// The schema tree, read-only.
    pub fn node(&self) -> &SchemaNode {
        &self.node
    }

    /// Render the JSON Schema document for this shape.
    pub fn to_json(&self) -> Value {
        render::render(&self.node)
    }

    /// Standalone-file form of [`to_json`](JsonSchema::to_json), with a
    /// `$schema` draft identifier prepended.
    pub fn to_document(&self) -> Value {
        render::to_document(&self.node)
    }

    /// Pretty-printed schema document. Like the `Display` form, equal
    /// declarations yield byte-identical text.
    pub fn to_string_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.to_json())
            .expect("schema documents always serialize")
    }

    /// Parse raw JSON text and decode it into a `T`. Malformed input
    /// surfaces as a syntax error; shape violations carry the path to
    /// the offending value.
    pub fn decode(&self, text: &str) -> Result<T, DecodeError> {
        decode::parse(text, &self.decoder)
    }

    /// Decode an already-parsed value.
    pub fn decode_value(&self, value: &Value) -> Result<T, DecodeError> {
        self.decoder.run(value)
    }

    /// Attach a documentation string. The rendered document gains a
    /// `description` key after its other entries; the decoder is
    /// unchanged.
    pub fn describe(self, text: impl Into<String>) -> Self {
        Self {
            node: SchemaNode::Description {
                inner: Box::new(self.node),
                text: text.into(),
            },
            decoder: self.decoder,
        }
    }

    /// Transform decoded values with a pure function; the schema side is
    /// untouched. This is how union variants with different Rust types
    /// unify on one result type before `one_of` or `tagged_union`.
    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + Send + Sync + 'static) -> JsonSchema<U> {
        JsonSchema {
            node: self.node,
            decoder: self.decoder.map(f),
        }
    }
}

/// Compact schema document text. Deterministic: equal declarations
/// yield byte-identical output.
impl<T> fmt::Display for JsonSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(&render::render(&self.node)).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

// ------------------------------ Primitives ------------------------------ //

/// JSON string, decoding to `String`.
pub fn string() -> JsonSchema<String> {
    JsonSchema::from_parts(SchemaNode::String, decode::string())
}

/// JSON integer, decoding to `i64`. Fractional input is rejected at
/// decode time.
pub fn integer() -> JsonSchema<i64> {
    JsonSchema::from_parts(SchemaNode::Integer, decode::integer())
}

/// JSON number, decoding to `f64`. Integral input is accepted.
pub fn number() -> JsonSchema<f64> {
    JsonSchema::from_parts(SchemaNode::Number, decode::float())
}

/// JSON boolean, decoding to `bool`.
pub fn boolean() -> JsonSchema<bool> {
    JsonSchema::from_parts(SchemaNode::Boolean, decode::boolean())
}

// ------------------------------ Wrappers ------------------------------ //

/// Homogeneous array of `of`, decoding to `Vec` in element order.
pub fn array<T: 'static>(of: JsonSchema<T>) -> JsonSchema<Vec<T>> {
    let (node, decoder) = of.into_parts();
    JsonSchema::from_parts(SchemaNode::Array(Box::new(node)), decode::list(decoder))
}

/// `inner` or JSON null; null decodes to `None`.
///
/// Renders as a merged `type` array when the inner shape has a single
/// type name, and as an `anyOf` with null otherwise.
pub fn nullable<T: 'static>(inner: JsonSchema<T>) -> JsonSchema<Option<T>> {
    let (node, decoder) = inner.into_parts();
    JsonSchema::from_parts(
        SchemaNode::Nullable(Box::new(node)),
        decode::null_or(decoder),
    )
}

// ------------------------------ Tests ------------------------------ //
