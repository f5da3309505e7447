//! Object declaration: ordered fields in, one typed decoder out.
//!
//! Rendering an object needs the complete field list up front, while
//! decoding needs a per-field value pipeline. [`ObjectBuilder`] grows
//! both in lockstep: every field-declaring call pushes the field's node
//! onto an ordered list (the structural side) and composes the field's
//! decoder onto a growing tuple decoder (the value side). [`build`]
//! seals the list into an `Object` node and applies the caller's
//! finishing function to the decoded tuple, so the document and the
//! decoder always describe the same fields in the same order.
//!
//! [`build`]: ObjectBuilder::build

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::decode::{self, Decoder};
use crate::node::{ObjectField, SchemaNode};
use crate::schema::JsonSchema;

// ------------------------------ Tuple growth ------------------------------ //

/// Append one value to a tuple, growing its arity by one.
///
/// Implemented for tuples of up to 15 elements, which caps an object
/// declaration at 16 fields.
pub trait TupleAppend<V>: Sized {
    type Out;
    fn append(self, value: V) -> Self::Out;
}

macro_rules! impl_tuple_append {
    ($($name:ident),*) => {
        impl<V, $($name),*> TupleAppend<V> for ($($name,)*) {
            type Out = ($($name,)* V,);
            #[allow(non_snake_case)]
            fn append(self, value: V) -> Self::Out {
                let ($($name,)*) = self;
                ($($name,)* value,)
            }
        }
    };
}

impl_tuple_append!();
impl_tuple_append!(A);
impl_tuple_append!(A, B);
impl_tuple_append!(A, B, C);
impl_tuple_append!(A, B, C, D);
impl_tuple_append!(A, B, C, D, E);
impl_tuple_append!(A, B, C, D, E, F);
impl_tuple_append!(A, B, C, D, E, F, G);
impl_tuple_append!(A, B, C, D, E, F, G, H);
impl_tuple_append!(A, B, C, D, E, F, G, H, I);
impl_tuple_append!(A, B, C, D, E, F, G, H, I, J);
impl_tuple_append!(A, B, C, D, E, F, G, H, I, J, K);
impl_tuple_append!(A, B, C, D, E, F, G, H, I, J, K, L);
impl_tuple_append!(A, B, C, D, E, F, G, H, I, J, K, L, M);
impl_tuple_append!(A, B, C, D, E, F, G, H, I, J, K, L, M, N);
impl_tuple_append!(A, B, C, D, E, F, G, H, I, J, K, L, M, N, O);

// ------------------------------ Builder ------------------------------ //

/// An object declaration in progress.
///
/// `Tup` is the tuple of decoded field values accumulated so far, in
/// declaration order. Field names are not deduplicated: a repeated name
/// keeps one `properties` entry (the last declaration wins) and each
/// declaration decodes the same member independently.
pub struct ObjectBuilder<Tup> {
    fields: Vec<ObjectField>,
    decoder: Decoder<Tup>,
}

// Not derived: cloning a half-built declaration (to fork a shared field
// prefix) should not require the decoded tuple to be `Clone`.
impl<Tup> Clone for ObjectBuilder<Tup> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            decoder: self.decoder.clone(),
        }
    }
}

impl<Tup> fmt::Debug for ObjectBuilder<Tup> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectBuilder")
            .field("fields", &self.fields)
            .field("decoder", &self.decoder)
            .finish()
    }
}

/// Start an object declaration.
pub fn object() -> ObjectBuilder<()> {
    ObjectBuilder {
        fields: Vec::new(),
        decoder: decode::success(()),
    }
}

impl<Tup: 'static> ObjectBuilder<Tup> {
    /// Required field: listed in `required`, and decoding fails with
    /// `MissingField` when the member is absent.
    pub fn field<V: 'static>(
        mut self,
        name: impl Into<String>,
        schema: JsonSchema<V>,
    ) -> ObjectBuilder<Tup::Out>
    where
        Tup: TupleAppend<V>,
        Tup::Out: 'static,
    {
        let name = name.into();
        let (node, field_decoder) = schema.into_parts();
        self.fields.push(ObjectField {
            name: name.clone(),
            schema: node,
            required: true,
        });
        let step = decode::field(name, field_decoder);
        ObjectBuilder {
            fields: self.fields,
            decoder: append_step(self.decoder, step),
        }
    }

    /// Optional field: absent decodes to `None`, and a present value
    /// (null included) is decoded with `schema` and wrapped in `Some`.
    /// The field's node is unchanged and left out of `required`.
    pub fn optional_field<V: 'static>(
        mut self,
        name: impl Into<String>,
        schema: JsonSchema<V>,
    ) -> ObjectBuilder<Tup::Out>
    where
        Tup: TupleAppend<Option<V>>,
        Tup::Out: 'static,
    {
        let name = name.into();
        let (node, field_decoder) = schema.into_parts();
        self.fields.push(ObjectField {
            name: name.clone(),
            schema: node,
            required: false,
        });
        let step = decode::optional_field(name, field_decoder);
        ObjectBuilder {
            fields: self.fields,
            decoder: append_step(self.decoder, step),
        }
    }

    /// Optional nullable field: absent and explicit null both decode to
    /// `None`. The field's node is wrapped `Nullable` and left out of
    /// `required`.
    pub fn optional_or_null_field<V: 'static>(
        mut self,
        name: impl Into<String>,
        schema: JsonSchema<V>,
    ) -> ObjectBuilder<Tup::Out>
    where
        Tup: TupleAppend<Option<V>>,
        Tup::Out: 'static,
    {
        let name = name.into();
        let (node, field_decoder) = schema.into_parts();
        self.fields.push(ObjectField {
            name: name.clone(),
            schema: SchemaNode::Nullable(Box::new(node)),
            required: false,
        });
        let step = decode::optional_field(name, decode::null_or(field_decoder))
            .map(|member| member.flatten());
        ObjectBuilder {
            fields: self.fields,
            decoder: append_step(self.decoder, step),
        }
    }

    /// Field with a fallback: an absent member decodes to `default`
    /// directly, with no `Option` marker, and the field's node gains a
    /// rendered `default` annotation. A present member must still match
    /// `schema`; null is not absence.
    pub fn field_with_default<V>(
        mut self,
        name: impl Into<String>,
        schema: JsonSchema<V>,
        default: V,
    ) -> ObjectBuilder<Tup::Out>
    where
        V: Clone + Serialize + Send + Sync + 'static,
        Tup: TupleAppend<V>,
        Tup::Out: 'static,
    {
        let name = name.into();
        let (node, field_decoder) = schema.into_parts();
        let rendered = serde_json::to_value(&default).unwrap_or(Value::Null);
        self.fields.push(ObjectField {
            name: name.clone(),
            schema: SchemaNode::Default {
                inner: Box::new(node),
                value: rendered,
            },
            required: false,
        });
        let step = decode::optional_field(name, field_decoder)
            .map(move |member| member.unwrap_or_else(|| default.clone()));
        ObjectBuilder {
            fields: self.fields,
            decoder: append_step(self.decoder, step),
        }
    }

    /// Seal the declaration: the accumulated fields become one `Object`
    /// node, and `finish` maps the decoded field tuple onto the caller's
    /// type. With no fields declared, the decoder accepts any input and
    /// the document still requires an object.
    pub fn build<T: 'static>(
        self,
        finish: impl Fn(Tup) -> T + Send + Sync + 'static,
    ) -> JsonSchema<T> {
        JsonSchema::from_parts(SchemaNode::Object(self.fields), self.decoder.map(finish))
    }
}

/// Extend the accumulated tuple decoder by one field step. Both run
/// against the whole object value; `step` extracts its own member.
fn append_step<Tup, V>(prev: Decoder<Tup>, step: Decoder<V>) -> Decoder<Tup::Out>
where
    Tup: TupleAppend<V> + 'static,
    V: 'static,
    Tup::Out: 'static,
{
    Decoder::new(move |value| {
        let tuple = prev.run(value)?;
        let member = step.run(value)?;
        Ok(tuple.append(member))
    })
}

// ------------------------------ Tests ------------------------------ //
