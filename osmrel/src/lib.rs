//! Validation and normalization of OpenStreetMap nodes and ways.
//!
//! Raw records (as produced by an OSM reader) are checked with
//! [`RecordValidator`], their tag keys are classified and split into
//! namespace and key, `addr:street` values are normalized, and finally
//! [`RecordShaper`] turns each record into flat rows ready for a tabular
//! store.

mod audit;
pub mod config;
mod error;
pub mod keys;
mod record;
mod shape;
pub mod street;
mod validate;

pub use crate::audit::{Audit, AuditReport, KindAudit};
pub use crate::config::{BoundingBox, Config};
pub use crate::error::ValidationError;
pub use crate::keys::{classify, split_key, KeyType, SplitKey};
pub use crate::record::{ElementKind, RawRecord, RawTag};
pub use crate::shape::{
    is_valid_postcode, Diagnostic, Element, NodeRow, RecordShaper, Shaped, TagRow, WayNodeRow,
    WayRow,
};
pub use crate::street::{normalize, normalize_street, NormalizedStreet, Rule};
pub use crate::validate::{is_proper_timestamp, RecordValidator, UniqueIds};
