//! Fail-fast validation of raw records.

use std::collections::HashSet;

use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

use crate::config::{Config, LENGTH_REFERENCE, LENGTH_TOLERANCE};
use crate::error::ValidationError;
use crate::record::{ElementKind, RawRecord, RawTag};

lazy_static! {
    static ref DATE: Regex = Regex::new(r"[0-9]{4}-[0-9]{2}-[0-9]{2}T").unwrap();
    static ref TIME: Regex = Regex::new(r"[0-9]{2}:[0-9]{2}:[0-9]{2}Z").unwrap();
}

/// Checks a timestamp of the form `YYYY-MM-DDTHH:MM:SSZ`.
///
/// The value is split at its first `T`, which both halves keep. The date must
/// end right at that `T`, the time may appear anywhere after it. Leading and
/// trailing text is not checked.
pub fn is_proper_timestamp(value: &str) -> bool {
    match value.find('T') {
        Some(pos) => DATE.is_match(&value[..=pos]) && TIME.is_match(&value[pos..]),
        None => false,
    }
}

/// Checks that the textual length of `value` is within the tolerance band
/// around the reference length `expected`.
pub fn in_length_range(value: &str, expected: usize) -> bool {
    let len = value.chars().count();
    expected.saturating_sub(LENGTH_TOLERANCE) <= len && len <= expected + LENGTH_TOLERANCE
}

/// Collects ids of one element kind to detect duplicates at the end of a run.
///
/// Ids are compared as written, so `"0123"` and `"123"` are distinct.
#[derive(Debug)]
pub struct UniqueIds {
    kind: ElementKind,
    ids: HashSet<String>,
    total: usize,
    first_duplicate: Option<String>,
}

impl UniqueIds {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            ids: HashSet::new(),
            total: 0,
            first_duplicate: None,
        }
    }

    pub fn insert(&mut self, id: &str) {
        self.total += 1;
        if !self.ids.insert(id.to_string()) && self.first_duplicate.is_none() {
            self.first_duplicate = Some(id.to_string());
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Compares the number of distinct ids with the number of records seen.
    pub fn check(&self) -> Result<(), ValidationError> {
        if self.ids.len() == self.total {
            return Ok(());
        }
        Err(ValidationError::Uniqueness {
            kind: self.kind,
            distinct: self.ids.len(),
            total: self.total,
            duplicate: self.first_duplicate.clone().unwrap_or_default(),
        })
    }
}

/// Validates records of a single run.
///
/// Each record is checked in isolation and rejected at its first problem.
/// The validator also remembers the ids of all accepted records; call
/// [`RecordValidator::finish`] after the last record to check that ids are
/// unique per element kind.
#[derive(Debug)]
pub struct RecordValidator {
    config: Config,
    nodes: UniqueIds,
    ways: UniqueIds,
}

impl Default for RecordValidator {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl RecordValidator {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            nodes: UniqueIds::new(ElementKind::Node),
            ways: UniqueIds::new(ElementKind::Way),
        }
    }

    pub fn validate(&mut self, record: &RawRecord) -> Result<(), ValidationError> {
        let kind = record.kind;
        let id = record.id();

        for &(field, expected) in LENGTH_REFERENCE.iter() {
            let value = required(record, field)?;
            value.parse::<i64>().map_err(|_| ValidationError::Format {
                kind,
                id: id.into(),
                field: field.into(),
                value: value.into(),
            })?;
            if !in_length_range(value, expected) {
                return Err(ValidationError::Range {
                    kind,
                    id: id.into(),
                    field: field.into(),
                    value: value.into(),
                });
            }
        }

        if kind == ElementKind::Node {
            self.check_coordinates(record)?;
        }

        let timestamp = required(record, "timestamp")?;
        if !is_proper_timestamp(timestamp) {
            return Err(ValidationError::Format {
                kind,
                id: id.into(),
                field: "timestamp".into(),
                value: timestamp.into(),
            });
        }

        for tag in &record.tags {
            check_tag(record, tag)?;
        }

        trace!("{} {} is valid", kind, id);
        match kind {
            ElementKind::Node => self.nodes.insert(id),
            ElementKind::Way => self.ways.insert(id),
        }
        Ok(())
    }

    fn check_coordinates(&self, record: &RawRecord) -> Result<(), ValidationError> {
        let parse = |field: &str| -> Result<f64, ValidationError> {
            let value = required(record, field)?;
            value.parse::<f64>().map_err(|_| ValidationError::Format {
                kind: record.kind,
                id: record.id().into(),
                field: field.into(),
                value: value.into(),
            })
        };
        let lat = parse("lat")?;
        let lon = parse("lon")?;

        let field = if !self.config.bbox.contains_lat(lat) {
            "lat"
        } else if !self.config.bbox.contains_lon(lon) {
            "lon"
        } else {
            return Ok(());
        };
        Err(ValidationError::GeoBounds {
            kind: record.kind,
            id: record.id().into(),
            field: field.into(),
            lat,
            lon,
        })
    }

    /// Number of records accepted so far per kind.
    pub fn accepted(&self, kind: ElementKind) -> usize {
        match kind {
            ElementKind::Node => self.nodes.total(),
            ElementKind::Way => self.ways.total(),
        }
    }

    /// Finishes the run by checking that ids are unique among nodes and
    /// among ways.
    pub fn finish(self) -> Result<(), ValidationError> {
        self.nodes.check()?;
        self.ways.check()
    }
}

fn required<'a>(record: &'a RawRecord, field: &str) -> Result<&'a str, ValidationError> {
    record.attr(field).ok_or_else(|| ValidationError::Missing {
        kind: record.kind,
        id: record.id().into(),
        field: field.into(),
    })
}

/// A tag must carry exactly the attributes `k` and `v`.
fn check_tag(record: &RawRecord, tag: &RawTag) -> Result<(), ValidationError> {
    let structural = |field: &str| ValidationError::Structural {
        kind: record.kind,
        id: record.id().into(),
        field: field.into(),
    };
    if let Some((name, _)) = tag.attributes.iter().find(|(k, _)| k != "k" && k != "v") {
        return Err(structural(name.as_str()));
    }
    for name in &["k", "v"] {
        let count = tag.attributes.iter().filter(|(k, _)| k == name).count();
        if count != 1 {
            return Err(structural(*name));
        }
    }
    Ok(())
}
