//! Unions and closed string sets.

use crate::decode::{self, Decoder};
use crate::error::{DecodeError, DecodeErrorKind, VariantError};
use crate::node::{CombinerKind, ObjectField, SchemaNode};
use crate::schema::JsonSchema;

// ------------------------------ Untagged unions ------------------------------ //

/// First-success union: renders `{"oneOf": [...]}` and decodes by trying
/// each variant in declaration order. Non-empty by construction; when
/// every variant fails, the error reports the count tried and the last
/// attempt's failure.
pub fn one_of<T: 'static>(
    first: JsonSchema<T>,
    rest: impl IntoIterator<Item = JsonSchema<T>>,
) -> JsonSchema<T> {
    combine(CombinerKind::OneOf, first, rest)
}

/// Same decode semantics as [`one_of`]; renders `"anyOf"`. The keyword
/// difference is information for schema consumers, not a decode-time
/// distinction.
pub fn any_of<T: 'static>(
    first: JsonSchema<T>,
    rest: impl IntoIterator<Item = JsonSchema<T>>,
) -> JsonSchema<T> {
    combine(CombinerKind::AnyOf, first, rest)
}

fn combine<T: 'static>(
    keyword: CombinerKind,
    first: JsonSchema<T>,
    rest: impl IntoIterator<Item = JsonSchema<T>>,
) -> JsonSchema<T> {
    let (first_node, first_decoder) = first.into_parts();
    let mut variants = vec![first_node];
    let mut decoders = Vec::new();
    for schema in rest {
        let (node, decoder) = schema.into_parts();
        variants.push(node);
        decoders.push(decoder);
    }
    JsonSchema::from_parts(
        SchemaNode::Combiner { keyword, variants },
        decode::one_of(first_decoder, decoders),
    )
}

// ------------------------------ Tagged unions ------------------------------ //

/// Discriminated union: every variant is an object shape carrying a
/// fixed tag under the `discriminator` key.
///
/// On the schema side, each variant's object node gains a required
/// `const` field for its tag, prepended ahead of the variant's own
/// fields, and the variants render under `oneOf`. On the decode side,
/// the discriminator is read as a string and compared against the tags
/// in declaration order; the first match runs that variant's decoder on
/// the whole object, and a failing matched variant does not fall through
/// to later ones. A tag matching no variant fails with the allowed-tag
/// list.
///
/// Variants are expected to be object declarations, possibly wrapped in
/// `describe` or a default; the tag is threaded through those wrappers.
/// Any other shape renders unchanged and can never decode, since the
/// discriminator read requires an object.
///
/// Variant declarations should not repeat the discriminator name: the
/// rendered `properties` map keeps one entry per name, so a variant's
/// own field under that name replaces the injected `const` tag in the
/// document, while decoding still gates on the tag value.
pub fn tagged_union<S, T>(
    discriminator: impl Into<String>,
    variants: Vec<(S, JsonSchema<T>)>,
) -> JsonSchema<T>
where
    S: Into<String>,
    T: 'static,
{
    let discriminator = discriminator.into();
    let mut nodes = Vec::with_capacity(variants.len());
    let mut arms: Vec<(String, Decoder<T>)> = Vec::with_capacity(variants.len());
    for (tag, schema) in variants {
        let tag = tag.into();
        let (node, decoder) = schema.into_parts();
        nodes.push(inject_tag(node, &discriminator, &tag));
        arms.push((tag, decoder));
    }

    let field = discriminator.clone();
    let read_tag = decode::field(discriminator, decode::string());
    let decoder = Decoder::new(move |value| {
        let tag = read_tag.run(value)?;
        for (candidate, arm) in &arms {
            if *candidate == tag {
                return arm.run(value);
            }
        }
        Err(DecodeError::new(DecodeErrorKind::NoVariantMatched(
            VariantError::UnknownTag {
                field: field.clone(),
                found: tag,
                allowed: arms.iter().map(|(candidate, _)| candidate.clone()).collect(),
            },
        )))
    });

    JsonSchema::from_parts(
        SchemaNode::Combiner {
            keyword: CombinerKind::OneOf,
            variants: nodes,
        },
        decoder,
    )
}

/// Prepend the required tag field to a variant's object node, reaching
/// through description and default wrappers.
fn inject_tag(node: SchemaNode, discriminator: &str, tag: &str) -> SchemaNode {
    match node {
        SchemaNode::Object(fields) => {
            let mut tagged = Vec::with_capacity(fields.len() + 1);
            tagged.push(ObjectField {
                name: discriminator.to_string(),
                schema: SchemaNode::Const(tag.to_string()),
                required: true,
            });
            tagged.extend(fields);
            SchemaNode::Object(tagged)
        }
        SchemaNode::Description { inner, text } => SchemaNode::Description {
            inner: Box::new(inject_tag(*inner, discriminator, tag)),
            text,
        },
        SchemaNode::Default { inner, value } => SchemaNode::Default {
            inner: Box::new(inject_tag(*inner, discriminator, tag)),
            value,
        },
        other => other,
    }
}

// ------------------------------ Closed string sets ------------------------------ //

/// Closed string set: renders `{"type":"string","enum":[...]}` and
/// decodes exactly the listed strings, yielding the matched string.
pub fn enum_of<I, S>(values: I) -> JsonSchema<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let values: Vec<String> = values.into_iter().map(Into::into).collect();
    let allowed = values.clone();
    let decoder = decode::string().and_then(move |found| {
        if allowed.contains(&found) {
            Ok(found)
        } else {
            Err(DecodeError::new(DecodeErrorKind::EnumMismatch {
                found,
                allowed: allowed.clone(),
            }))
        }
    });
    JsonSchema::from_parts(SchemaNode::Enum(values), decoder)
}

/// Closed string set where each allowed string carries an associated
/// value; the matched string decodes to its value. Renders identically
/// to [`enum_of`] over the same strings.
pub fn enum_map<S, T>(pairs: Vec<(S, T)>) -> JsonSchema<T>
where
    S: Into<String>,
    T: Clone + Send + Sync + 'static,
{
    let pairs: Vec<(String, T)> = pairs
        .into_iter()
        .map(|(name, value)| (name.into(), value))
        .collect();
    let values: Vec<String> = pairs.iter().map(|(name, _)| name.clone()).collect();
    let allowed = values.clone();
    let decoder = decode::string().and_then(move |found| {
        pairs
            .iter()
            .find(|(name, _)| *name == found)
            .map(|(_, value)| value.clone())
            .ok_or_else(|| {
                DecodeError::new(DecodeErrorKind::EnumMismatch {
                    found: found.clone(),
                    allowed: allowed.clone(),
                })
            })
    });
    JsonSchema::from_parts(SchemaNode::Enum(values), decoder)
}

/// Single allowed string: renders `{"type":"string","const":...}` and
/// decodes only that string.
pub fn constant(value: impl Into<String>) -> JsonSchema<String> {
    let value = value.into();
    let expected = value.clone();
    let decoder = decode::string().and_then(move |found| {
        if found == expected {
            Ok(found)
        } else {
            Err(DecodeError::new(DecodeErrorKind::EnumMismatch {
                found,
                allowed: vec![expected.clone()],
            }))
        }
    });
    JsonSchema::from_parts(SchemaNode::Const(value), decoder)
}

/// [`constant`] with the matched string mapped to a fixed value.
pub fn constant_map<T>(value: impl Into<String>, mapped: T) -> JsonSchema<T>
where
    T: Clone + Send + Sync + 'static,
{
    constant(value).map(move |_| mapped.clone())
}

// ------------------------------ Tests ------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::object;
    use crate::schema::{integer, number, string};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq)]
    enum Shape {
        Circle { radius: f64 },
        Square { side: f64 },
    }

    fn shape() -> JsonSchema<Shape> {
        tagged_union(
            "type",
            vec![
                (
                    "circle",
                    object()
                        .field("radius", number())
                        .build(|(radius,)| Shape::Circle { radius }),
                ),
                (
                    "square",
                    object()
                        .field("side", number())
                        .build(|(side,)| Shape::Square { side }),
                ),
            ],
        )
    }

    #[test]
    fn one_of_renders_its_keyword_and_tries_in_order() {
        let schema = one_of(
            integer().map(|n| n.to_string()),
            [string()],
        );
        assert_eq!(
            schema.to_string(),
            r#"{"oneOf":[{"type":"integer"},{"type":"string"}]}"#,
        );
        assert_eq!(schema.decode("7").unwrap(), "7");
        assert_eq!(schema.decode(r#""seven""#).unwrap(), "seven");
    }

    #[test]
    fn any_of_differs_only_in_the_keyword() {
        let schema = any_of(integer(), [integer()]);
        assert_eq!(
            schema.to_string(),
            r#"{"anyOf":[{"type":"integer"},{"type":"integer"}]}"#,
        );
        assert_eq!(schema.decode("3").unwrap(), 3);
    }

    #[test]
    fn exhausted_union_reports_the_last_failure() {
        let schema = one_of(integer().map(|_| ()), [string().map(|_| ())]);
        let err = schema.decode("true").unwrap_err();
        match err.kind() {
            DecodeErrorKind::NoVariantMatched(VariantError::AllFailed { tried, last }) => {
                assert_eq!(*tried, 2);
                assert_eq!(last.to_string(), "expected string, found boolean");
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn described_union_keeps_the_description_last() {
        let schema = one_of(integer(), [integer()]).describe("either");
        assert_eq!(
            schema.to_string(),
            r#"{"oneOf":[{"type":"integer"},{"type":"integer"}],"description":"either"}"#,
        );
    }

    #[test]
    fn tagged_union_injects_const_tags_ahead_of_variant_fields() {
        assert_eq!(
            shape().to_string(),
            concat!(
                r#"{"oneOf":["#,
                r#"{"type":"object","properties":{"type":{"type":"string","const":"circle"},"radius":{"type":"number"}},"required":["type","radius"]},"#,
                r#"{"type":"object","properties":{"type":{"type":"string","const":"square"},"side":{"type":"number"}},"required":["type","side"]}"#,
                r#"]}"#,
            ),
        );
    }

    #[test]
    fn tagged_union_decodes_by_discriminator() {
        assert_eq!(
            shape().decode(r#"{"type":"circle","radius":2.5}"#).unwrap(),
            Shape::Circle { radius: 2.5 },
        );
        assert_eq!(
            shape().decode(r#"{"type":"square","side":4.0}"#).unwrap(),
            Shape::Square { side: 4.0 },
        );
    }

    #[test]
    fn unknown_tag_lists_the_allowed_tags() {
        let err = shape().decode(r#"{"type":"triangle"}"#).unwrap_err();
        match err.kind() {
            DecodeErrorKind::NoVariantMatched(VariantError::UnknownTag {
                field,
                found,
                allowed,
            }) => {
                assert_eq!(field, "type");
                assert_eq!(found, "triangle");
                assert_eq!(allowed, &["circle".to_string(), "square".to_string()]);
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn matched_tag_does_not_fall_through_on_body_failure() {
        // The circle arm matches and then fails on its body; the square
        // arm must not be consulted.
        let err = shape().decode(r#"{"type":"circle"}"#).unwrap_err();
        assert_eq!(err.to_string(), "missing required field `radius`");
    }

    #[test]
    fn missing_discriminator_is_a_missing_field() {
        let err = shape().decode(r#"{"radius":1.0}"#).unwrap_err();
        assert_eq!(err.to_string(), "missing required field `type`");
    }

    #[test]
    fn tag_injection_reaches_through_describe() {
        let schema = tagged_union(
            "kind",
            vec![(
                "point",
                object()
                    .field("x", integer())
                    .build(|(x,)| x)
                    .describe("a point"),
            )],
        );
        assert_eq!(
            schema.to_string(),
            concat!(
                r#"{"oneOf":[{"type":"object","properties":{"#,
                r#""kind":{"type":"string","const":"point"},"x":{"type":"integer"}},"#,
                r#""required":["kind","x"],"description":"a point"}]}"#,
            ),
        );
        assert_eq!(schema.decode(r#"{"kind":"point","x":9}"#).unwrap(), 9);
    }

    #[test]
    fn enum_of_accepts_only_listed_strings() {
        let schema = enum_of(["red", "green"]);
        assert_eq!(
            schema.to_string(),
            r#"{"type":"string","enum":["red","green"]}"#,
        );
        assert_eq!(schema.decode(r#""red""#).unwrap(), "red");
        let err = schema.decode(r#""blue""#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown value \"blue\", expected one of: red, green",
        );
    }

    #[test]
    fn enum_rejects_non_strings_as_type_mismatches() {
        let err = enum_of(["red", "green"]).decode("3").unwrap_err();
        assert_eq!(err.to_string(), "expected string, found number");
    }

    #[test]
    fn enum_map_yields_the_associated_value() {
        #[derive(Debug, Clone, PartialEq)]
        enum Level {
            Low,
            High,
        }
        let schema = enum_map(vec![("low", Level::Low), ("high", Level::High)]);
        assert_eq!(
            schema.to_string(),
            r#"{"type":"string","enum":["low","high"]}"#,
        );
        assert_eq!(schema.decode(r#""high""#).unwrap(), Level::High);
        assert!(schema.decode(r#""medium""#).is_err());
    }

    #[test]
    fn constant_accepts_exactly_one_string() {
        let schema = constant("v1");
        assert_eq!(schema.to_string(), r#"{"type":"string","const":"v1"}"#);
        assert_eq!(schema.decode(r#""v1""#).unwrap(), "v1");
        let err = schema.decode(r#""v2""#).unwrap_err();
        assert_eq!(err.to_string(), "unknown value \"v2\", expected one of: v1");
    }

    #[test]
    fn constant_map_substitutes_its_value() {
        let schema = constant_map("enabled", true);
        assert_eq!(schema.decode(r#""enabled""#).unwrap(), true);
    }

    #[test]
    fn union_variants_can_be_full_documents() {
        let schema = one_of(
            object().field("id", integer()).build(|(id,)| id),
            [object().field("code", integer()).build(|(code,)| code)],
        );
        assert_eq!(schema.decode_value(&json!({ "code": 7 })).unwrap(), 7);
    }
}
