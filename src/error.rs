//! Decode-error taxonomy.
//!
//! Schema construction in this crate is total; only decoding fails, and
//! it fails by returning a [`DecodeError`] rather than panicking. Every
//! error carries the path from the document root to the offending value.
//! Segments are pushed innermost-first while the failure unwinds through
//! the decoder stack, then displayed outermost-first (`server.port`,
//! `items[2].id`).

use std::fmt;

use thiserror::Error;

// ------------------------------ Paths ------------------------------ //

/// One step from the document root toward a failing value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object member, by key.
    Field(String),
    /// Array element, by position.
    Index(usize),
}

// ------------------------------ Kinds ------------------------------ //

/// Why a decode attempt failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeErrorKind {
    /// Input text is not well-formed JSON. The message comes straight
    /// from the parser.
    #[error("invalid JSON: {0}")]
    Syntax(String),
    /// The value's JSON type is not the one the decoder handles.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// A required object field is absent.
    #[error("missing required field `{0}`")]
    MissingField(String),
    /// A string fell outside a closed set of allowed values.
    #[error("unknown value {found:?}, expected one of: {}", .allowed.join(", "))]
    EnumMismatch { found: String, allowed: Vec<String> },
    /// No alternative of a union accepted the value.
    #[error(transparent)]
    NoVariantMatched(VariantError),
}

/// Terminal failure of a union decode.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VariantError {
    /// Every alternative was tried in declaration order and failed; the
    /// last attempt's failure is kept as the representative cause.
    #[error("no variant matched ({tried} tried); last failure: {last}")]
    AllFailed { tried: usize, last: Box<DecodeError> },
    /// A tagged union read its discriminator but no variant claims that
    /// tag. Decoding stops before any variant body is attempted.
    #[error("discriminator {field:?} has unrecognized value {found:?}, expected one of: {}", .allowed.join(", "))]
    UnknownTag {
        field: String,
        found: String,
        allowed: Vec<String>,
    },
}

// ------------------------------ Error ------------------------------ //

/// A structured decode failure: what went wrong, and where.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeError {
    kind: DecodeErrorKind,
    path: Vec<PathSegment>, // innermost-first, see module docs
}

impl DecodeError {
    pub(crate) fn new(kind: DecodeErrorKind) -> Self {
        Self {
            kind,
            path: Vec::new(),
        }
    }

    pub(crate) fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        Self::new(DecodeErrorKind::TypeMismatch { expected, found })
    }

    pub(crate) fn missing_field(name: impl Into<String>) -> Self {
        Self::new(DecodeErrorKind::MissingField(name.into()))
    }

    /// Record `segment` as the next-outer location while the error
    /// unwinds.
    pub(crate) fn at(mut self, segment: PathSegment) -> Self {
        self.path.push(segment);
        self
    }

    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }

    /// Path from the document root to the failing value, outermost
    /// first. Empty when the failure is at the root.
    pub fn path(&self) -> impl Iterator<Item = &PathSegment> {
        self.path.iter().rev()
    }

    /// Dotted rendering of [`DecodeError::path`], e.g. `items[2].id`.
    pub fn path_string(&self) -> String {
        let mut out = String::new();
        for segment in self.path.iter().rev() {
            match segment {
                PathSegment::Field(name) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(name);
                }
                PathSegment::Index(index) => {
                    out.push('[');
                    out.push_str(&index.to_string());
                    out.push(']');
                }
            }
        }
        out
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "at {}: {}", self.path_string(), self.kind)
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::new(DecodeErrorKind::Syntax(err.to_string()))
    }
}

// ------------------------------ Tests ------------------------------ //
