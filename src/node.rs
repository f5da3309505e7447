// Schema tree shared by the renderer and the schema builders. Pure data;
// behavior lives in `render` (emission) and `decode` (value parsing).

use serde_json::Value;

/// One shape in a schema tree. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    String,
    Integer,
    Number,
    Boolean,
    Array(Box<SchemaNode>),      // homogeneous items
    Nullable(Box<SchemaNode>),   // inner type or null
    Object(Vec<ObjectField>),
    Enum(Vec<String>),           // closed string set
    Const(String),               // single allowed string
    Description {
        inner: Box<SchemaNode>,
        text: String,
    },
    Default {
        inner: Box<SchemaNode>,
        value: Value,            // absent-field fallback, pre-rendered
    },
    Combiner {
        keyword: CombinerKind,
        variants: Vec<SchemaNode>,
    },
}

/// Keyword emitted for a union of shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinerKind {
    OneOf,
    AnyOf,
}

impl CombinerKind {
    pub fn keyword(self) -> &'static str {
        match self {
            CombinerKind::OneOf => "oneOf",
            CombinerKind::AnyOf => "anyOf",
        }
    }
}

/// One object member.
///
/// Field order is declaration order and is load-bearing: it fixes both
/// the `properties` key order and the `required` array in rendered
/// output.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectField {
    pub name: String,
    pub schema: SchemaNode,
    pub required: bool,
}
