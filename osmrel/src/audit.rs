//! Audit pass: validates every record and collects histograms of street types
//! and key buckets per element kind.

use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;

use crate::config::{Config, STREET_KEY};
use crate::error::ValidationError;
use crate::keys::{classify, split_key, KeyType};
use crate::record::{ElementKind, RawRecord};
use crate::street::split_street;
use crate::validate::RecordValidator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindAudit {
    pub street_types: BTreeMap<String, usize>,
    pub key_types: BTreeMap<KeyType, usize>,
}

impl Default for KindAudit {
    fn default() -> Self {
        Self {
            street_types: BTreeMap::new(),
            key_types: KeyType::ALL.iter().map(|t| (*t, 0)).collect(),
        }
    }
}

#[derive(Debug)]
pub struct Audit {
    config: Config,
    validator: RecordValidator,
    nodes: KindAudit,
    ways: KindAudit,
}

impl Default for Audit {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Audit {
    pub fn new(config: Config) -> Self {
        Self {
            validator: RecordValidator::new(config.clone()),
            config,
            nodes: KindAudit::default(),
            ways: KindAudit::default(),
        }
    }

    /// Validates the record, then counts its street types and key buckets.
    pub fn observe(&mut self, record: &RawRecord) -> Result<(), ValidationError> {
        self.validator.validate(record)?;

        let audit = match record.kind {
            ElementKind::Node => &mut self.nodes,
            ElementKind::Way => &mut self.ways,
        };
        // tags are structurally sound after validation
        for (key, value) in record.tags.iter().filter_map(|t| Some((t.key()?, t.value()?))) {
            let split = split_key(key, &self.config.default_tag_type);
            if split.is(&self.config.address_namespace, STREET_KEY) {
                let (street_type, _) = split_street(value);
                if !street_type.is_empty() {
                    *audit.street_types.entry(street_type.into()).or_default() += 1;
                }
            }
            *audit.key_types.entry(classify(key)).or_default() += 1;
        }
        Ok(())
    }

    /// Checks id uniqueness over all observed records and returns the report.
    pub fn finish(self) -> Result<AuditReport, ValidationError> {
        self.validator.finish()?;
        Ok(AuditReport {
            nodes: self.nodes,
            ways: self.ways,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditReport {
    pub nodes: KindAudit,
    pub ways: KindAudit,
}

fn write_section<'a>(
    f: &mut fmt::Formatter,
    title: &str,
    counts: impl Iterator<Item = (&'a str, usize)>,
) -> fmt::Result {
    writeln!(f, "\n{}\n{}", title, "=".repeat(title.len()))?;
    for (name, count) in counts.sorted_by_key(|(name, _)| name.to_lowercase()) {
        writeln!(f, "{}: {}", name, count)?;
    }
    Ok(())
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        for (label, audit) in &[("NODES", &self.nodes), ("WAYS", &self.ways)] {
            write_section(
                f,
                &format!("{}: STREET TYPES", label),
                audit.street_types.iter().map(|(k, v)| (k.as_str(), *v)),
            )?;
            write_section(
                f,
                &format!("{}: KEY TYPES", label),
                audit.key_types.iter().map(|(k, v)| (k.as_str(), *v)),
            )?;
        }
        Ok(())
    }
}
