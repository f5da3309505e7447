//! Decode combinators over parsed JSON values.
//!
//! serde_json owns text parsing; this module supplies the typed layer on
//! top of it. A [`Decoder<T>`] is a pure function from a parsed
//! [`Value`] to either a `T` or a [`DecodeError`]. The builders in
//! `schema`, `object`, and `combinators` pair these with schema nodes;
//! the combinators here also stand on their own for callers that only
//! need typed extraction.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{DecodeError, DecodeErrorKind, PathSegment, VariantError};

// ------------------------------ Decoder ------------------------------ //

/// A pure function from a parsed JSON value to a typed result.
///
/// Cheap to clone (the function is behind an `Arc`) and safe to share
/// across threads. Running a decoder never mutates anything.
pub struct Decoder<T> {
    run: Arc<dyn Fn(&Value) -> Result<T, DecodeError> + Send + Sync>,
}

// Not derived: `T` itself need not be `Clone` to share the function.
impl<T> Clone for Decoder<T> {
    fn clone(&self) -> Self {
        Self {
            run: Arc::clone(&self.run),
        }
    }
}

impl<T: 'static> Decoder<T> {
    pub(crate) fn new(
        run: impl Fn(&Value) -> Result<T, DecodeError> + Send + Sync + 'static,
    ) -> Self {
        Self { run: Arc::new(run) }
    }

    /// Run the decoder against a parsed value.
    pub fn run(&self, value: &Value) -> Result<T, DecodeError> {
        (self.run)(value)
    }

    /// Post-compose a pure transform onto the decoded value.
    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + Send + Sync + 'static) -> Decoder<U> {
        Decoder::new(move |value| self.run(value).map(&f))
    }

    /// Sequence a fallible continuation after this decoder.
    pub fn and_then<U: 'static>(
        self,
        f: impl Fn(T) -> Result<U, DecodeError> + Send + Sync + 'static,
    ) -> Decoder<U> {
        Decoder::new(move |value| self.run(value).and_then(&f))
    }
}

impl<T> fmt::Debug for Decoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Decoder(..)")
    }
}

/// JSON type name used in mismatch reports.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ------------------------------ Primitives ------------------------------ //

/// Accept a JSON string.
pub fn string() -> Decoder<String> {
    Decoder::new(|value| match value {
        Value::String(text) => Ok(text.clone()),
        other => Err(DecodeError::type_mismatch("string", json_type_name(other))),
    })
}

/// Accept a JSON number with an exact `i64` representation. Floats and
/// out-of-range integers are mismatches, not truncations.
pub fn integer() -> Decoder<i64> {
    Decoder::new(|value| {
        value
            .as_i64()
            .ok_or_else(|| DecodeError::type_mismatch("integer", json_type_name(value)))
    })
}

/// Accept any JSON number as `f64`.
pub fn float() -> Decoder<f64> {
    Decoder::new(|value| {
        value
            .as_f64()
            .ok_or_else(|| DecodeError::type_mismatch("number", json_type_name(value)))
    })
}

/// Accept a JSON boolean.
pub fn boolean() -> Decoder<bool> {
    Decoder::new(|value| {
        value
            .as_bool()
            .ok_or_else(|| DecodeError::type_mismatch("boolean", json_type_name(value)))
    })
}

// ------------------------------ Containers ------------------------------ //

/// Decode every element of a JSON array with `inner`, preserving order.
/// The first failing element wins and its index joins the error path.
pub fn list<T: 'static>(inner: Decoder<T>) -> Decoder<Vec<T>> {
    Decoder::new(move |value| match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                inner
                    .run(item)
                    .map_err(|err| err.at(PathSegment::Index(index)))
            })
            .collect(),
        other => Err(DecodeError::type_mismatch("array", json_type_name(other))),
    })
}

/// Accept JSON null as `None`; defer to `inner` otherwise.
pub fn null_or<T: 'static>(inner: Decoder<T>) -> Decoder<Option<T>> {
    Decoder::new(move |value| match value {
        Value::Null => Ok(None),
        other => inner.run(other).map(Some),
    })
}

// ------------------------------ Object fields ------------------------------ //

/// Require object key `name` and decode its value with `inner`. Absence
/// is a `MissingField` error reported at the object, not inside it.
pub fn field<T: 'static>(name: impl Into<String>, inner: Decoder<T>) -> Decoder<T> {
    let name = name.into();
    Decoder::new(move |value| match value {
        Value::Object(map) => match map.get(&name) {
            Some(member) => inner
                .run(member)
                .map_err(|err| err.at(PathSegment::Field(name.clone()))),
            None => Err(DecodeError::missing_field(name.clone())),
        },
        other => Err(DecodeError::type_mismatch("object", json_type_name(other))),
    })
}

/// Decode object key `name` when present, yield `None` when absent. A
/// present null is handed to `inner` unchanged; it only decodes when
/// `inner` accepts null.
pub fn optional_field<T: 'static>(
    name: impl Into<String>,
    inner: Decoder<T>,
) -> Decoder<Option<T>> {
    let name = name.into();
    Decoder::new(move |value| match value {
        Value::Object(map) => match map.get(&name) {
            Some(member) => inner
                .run(member)
                .map(Some)
                .map_err(|err| err.at(PathSegment::Field(name.clone()))),
            None => Ok(None),
        },
        other => Err(DecodeError::type_mismatch("object", json_type_name(other))),
    })
}

// ------------------------------ Control ------------------------------ //

/// Ignore the input and yield `value`.
pub fn success<T>(value: T) -> Decoder<T>
where
    T: Clone + Send + Sync + 'static,
{
    Decoder::new(move |_| Ok(value.clone()))
}

/// Always fail, reporting what was expected.
pub fn fail<T: 'static>(expected: &'static str) -> Decoder<T> {
    Decoder::new(move |value| Err(DecodeError::type_mismatch(expected, json_type_name(value))))
}

/// Try `first`, then each decoder in `rest`, in order; the first success
/// wins. When every alternative fails, report how many were tried along
/// with the failure of the last attempt.
pub fn one_of<T: 'static>(first: Decoder<T>, rest: Vec<Decoder<T>>) -> Decoder<T> {
    Decoder::new(move |value| {
        let mut last = match first.run(value) {
            Ok(decoded) => return Ok(decoded),
            Err(err) => err,
        };
        for alternative in &rest {
            match alternative.run(value) {
                Ok(decoded) => return Ok(decoded),
                Err(err) => last = err,
            }
        }
        Err(DecodeError::new(DecodeErrorKind::NoVariantMatched(
            VariantError::AllFailed {
                tried: 1 + rest.len(),
                last: Box::new(last),
            },
        )))
    })
}

// ------------------------------ Parsing ------------------------------ //

/// Parse raw JSON text and run `decoder` on the result. Parser failures
/// pass through as [`DecodeErrorKind::Syntax`]; no decoder runs on
/// malformed input.
pub fn parse<T: 'static>(text: &str, decoder: &Decoder<T>) -> Result<T, DecodeError> {
    let value: Value = serde_json::from_str(text)?;
    decoder.run(&value)
}

// ------------------------------ Tests ------------------------------ //
