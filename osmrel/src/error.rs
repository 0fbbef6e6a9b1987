//! Errors raised while validating or shaping records.

use crate::record::ElementKind;
use thiserror::Error;

/// A record failed one of the checks.
///
/// All variants carry the kind of the offending record and the attribute
/// (field) which failed, so the caller can point at the input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Tag does not have exactly the attributes `k` and `v`.
    #[error("tag in {kind} {id} has an unexpected attribute set ({field})")]
    Structural {
        kind: ElementKind,
        id: String,
        field: String,
    },

    /// Required attribute is absent.
    #[error("missing attrib.{field} in {kind} {id}")]
    Missing {
        kind: ElementKind,
        id: String,
        field: String,
    },

    /// Length of a numeric attribute is outside of the tolerated band.
    #[error("detected out of range value '{value}' for attrib.{field} in {kind} {id}")]
    Range {
        kind: ElementKind,
        id: String,
        field: String,
        value: String,
    },

    /// Attribute cannot be parsed or does not follow the expected format.
    #[error("invalid attrib.{field} '{value}' in {kind} {id}")]
    Format {
        kind: ElementKind,
        id: String,
        field: String,
        value: String,
    },

    /// Coordinates are outside of the configured bounding box.
    #[error("invalid set of coordinates ({lat}, {lon}) in {kind} {id}: attrib.{field} out of bounds")]
    GeoBounds {
        kind: ElementKind,
        id: String,
        field: String,
        lat: f64,
        lon: f64,
    },

    /// Some ids were observed more than once during a run.
    #[error(
        "found attrib.id not unique among {kind}s: {distinct} distinct ids in {total} records \
         (first duplicate: {duplicate})"
    )]
    Uniqueness {
        kind: ElementKind,
        distinct: usize,
        total: usize,
        duplicate: String,
    },
}

impl ValidationError {
    pub fn kind(&self) -> ElementKind {
        match self {
            ValidationError::Structural { kind, .. }
            | ValidationError::Missing { kind, .. }
            | ValidationError::Range { kind, .. }
            | ValidationError::Format { kind, .. }
            | ValidationError::GeoBounds { kind, .. }
            | ValidationError::Uniqueness { kind, .. } => *kind,
        }
    }

    /// Id of the offending record; `None` for errors spanning a whole run.
    pub fn id(&self) -> Option<&str> {
        match self {
            ValidationError::Structural { id, .. }
            | ValidationError::Missing { id, .. }
            | ValidationError::Range { id, .. }
            | ValidationError::Format { id, .. }
            | ValidationError::GeoBounds { id, .. } => Some(id),
            ValidationError::Uniqueness { .. } => None,
        }
    }

    pub fn field(&self) -> &str {
        match self {
            ValidationError::Structural { field, .. }
            | ValidationError::Missing { field, .. }
            | ValidationError::Range { field, .. }
            | ValidationError::Format { field, .. }
            | ValidationError::GeoBounds { field, .. } => field,
            ValidationError::Uniqueness { .. } => "id",
        }
    }
}
