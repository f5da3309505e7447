//! Declare a data shape once; get a JSON Schema document and a typed
//! decoder from the same declaration.
//!
//! The usual failure mode of hand-maintained schemas is drift: the
//! document says one thing, the parsing code another. Here both sides
//! come out of a single builder expression, so they cannot disagree.
//!
//! ```
//! use json_shape::{integer, object, string};
//!
//! #[derive(Debug, PartialEq)]
//! struct Server {
//!     host: String,
//!     port: i64,
//!     banner: Option<String>,
//! }
//!
//! let schema = object()
//!     .field("host", string())
//!     .field_with_default("port", integer(), 8080)
//!     .optional_or_null_field("banner", string())
//!     .build(|(host, port, banner)| Server { host, port, banner });
//!
//! // The document side: deterministic text, declaration order kept.
//! assert_eq!(
//!     schema.to_string(),
//!     r#"{"type":"object","properties":{"host":{"type":"string"},"port":{"type":"integer","default":8080},"banner":{"type":["string","null"]}},"required":["host"]}"#,
//! );
//!
//! // The decoder side: same declaration, typed result.
//! let server = schema.decode(r#"{"host":"localhost"}"#).unwrap();
//! assert_eq!(
//!     server,
//!     Server { host: "localhost".into(), port: 8080, banner: None },
//! );
//! ```
//!
//! Design points:
//!
//! - Schemas are immutable values: build once, clone cheaply, share
//!   across threads.
//! - Construction is total. Failures exist only at decode time, as
//!   [`DecodeError`] values carrying the path to the offending input.
//! - Rendered key order is part of the contract; equal declarations
//!   produce byte-identical documents.
//! - Decoding reads JSON into Rust values. There is no encoder, so a
//!   decoded value does not round-trip back to its input text.

pub mod combinators;
pub mod decode;
pub mod error;
pub mod node;
pub mod object;
pub mod render;
pub mod schema;

pub use combinators::{any_of, constant, constant_map, enum_map, enum_of, one_of, tagged_union};
pub use decode::Decoder;
pub use error::{DecodeError, DecodeErrorKind, PathSegment, VariantError};
pub use node::{CombinerKind, ObjectField, SchemaNode};
pub use object::{ObjectBuilder, TupleAppend, object};
pub use schema::{JsonSchema, array, boolean, integer, nullable, number, string};

#[cfg(test)]
mod tests {
    // Whole-crate lifecycle coverage. Note there is no encoder in this
    // crate, so no decode/encode round-trip law exists to assert;
    // document determinism stands in for it (see `render::tests`).

    use once_cell::sync::Lazy;

    use super::*;

    #[derive(Debug, PartialEq)]
    struct Config {
        name: String,
        port: i64,
        tags: Option<Vec<String>>,
        region: Option<String>,
    }

    fn config_schema() -> JsonSchema<Config> {
        object()
            .field("name", string().describe("service name"))
            .field_with_default("port", integer(), 8080)
            .optional_field("tags", array(string()))
            .optional_or_null_field("region", enum_of(["us", "eu"]))
            .build(|(name, port, tags, region)| Config {
                name,
                port,
                tags,
                region,
            })
            .describe("service configuration")
    }

    #[test]
    fn config_document_matches_the_declaration() {
        assert_eq!(
            config_schema().to_string(),
            concat!(
                r#"{"type":"object","properties":{"#,
                r#""name":{"type":"string","description":"service name"},"#,
                r#""port":{"type":"integer","default":8080},"#,
                r#""tags":{"type":"array","items":{"type":"string"}},"#,
                r#""region":{"type":["string","null"],"enum":["us","eu"]}},"#,
                r#""required":["name"],"description":"service configuration"}"#,
            ),
        );
    }

    #[test]
    fn config_decodes_with_defaults_and_null_flattening() {
        let minimal = config_schema()
            .decode(r#"{"name":"api","region":null}"#)
            .unwrap();
        assert_eq!(
            minimal,
            Config {
                name: "api".to_string(),
                port: 8080,
                tags: None,
                region: None,
            },
        );

        let full = config_schema()
            .decode(r#"{"name":"api","port":9090,"tags":["edge"],"region":"eu"}"#)
            .unwrap();
        assert_eq!(full.port, 9090);
        assert_eq!(full.tags, Some(vec!["edge".to_string()]));
        assert_eq!(full.region, Some("eu".to_string()));
    }

    #[test]
    fn config_errors_point_into_the_document() {
        let err = config_schema()
            .decode(r#"{"name":"api","tags":["a",3]}"#)
            .unwrap_err();
        assert_eq!(err.path_string(), "tags[1]");
    }

    static SHARED: Lazy<JsonSchema<(String, i64)>> = Lazy::new(|| {
        object()
            .field("id", string())
            .field("n", integer())
            .build(|(id, n)| (id, n))
    });

    #[test]
    fn one_static_schema_serves_many_threads() {
        let handles: Vec<_> = (0..4)
            .map(|n| {
                std::thread::spawn(move || {
                    let text = format!(r#"{{"id":"w{n}","n":{n}}}"#);
                    SHARED.decode(&text).unwrap()
                })
            })
            .collect();
        for (n, handle) in handles.into_iter().enumerate() {
            let (id, value) = handle.join().unwrap();
            assert_eq!(id, format!("w{n}"));
            assert_eq!(value, n as i64);
        }
    }

    #[test]
    fn schemas_are_shareable_even_for_unclonable_results() {
        fn assert_shareable<S: Clone + Send + Sync>(_: &S) {}
        struct NotClone;
        let schema = string().map(|_| NotClone);
        assert_shareable(&schema);
    }

    #[test]
    fn malformed_text_surfaces_the_parser_message() {
        let err = config_schema().decode("{").unwrap_err();
        match err.kind() {
            DecodeErrorKind::Syntax(message) => assert!(!message.is_empty()),
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn pretty_output_is_also_deterministic() {
        let a = config_schema().to_string_pretty();
        let b = config_schema().to_string_pretty();
        assert_eq!(a, b);
        assert!(a.contains('\n'));
    }
}
