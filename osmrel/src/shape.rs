//! Shapes raw records into the rows of the relational schema.
//!
//! A node becomes one `node` row plus its `node_tags` rows; a way becomes one
//! `way` row, its `way_nodes` rows and its `way_tags` rows. Tag keys are split
//! into namespace (`type`) and local key, street names are normalized and
//! malformed postcodes are nulled.

use log::{debug, warn};
use serde::Serialize;

use crate::config::{Config, POSTCODE_DIGITS, POSTCODE_KEY, STREET_KEY};
use crate::error::ValidationError;
use crate::keys::split_key;
use crate::record::{ElementKind, RawRecord, RawTag};
use crate::street::{normalize_street, split_street};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRow {
    pub id: String,
    pub lat: String,
    pub lon: String,
    pub user: String,
    pub uid: String,
    pub version: String,
    pub changeset: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WayRow {
    pub id: String,
    pub user: String,
    pub uid: String,
    pub version: String,
    pub changeset: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagRow {
    /// Id of the owning node or way.
    pub id: String,
    pub key: Option<String>,
    pub value: Option<String>,
    #[serde(rename = "type")]
    pub tag_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WayNodeRow {
    pub id: String,
    pub node_id: String,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Node {
        node: NodeRow,
        tags: Vec<TagRow>,
    },
    Way {
        way: WayRow,
        nodes: Vec<WayNodeRow>,
        tags: Vec<TagRow>,
    },
}

impl Element {
    pub fn tags(&self) -> &[TagRow] {
        match self {
            Element::Node { tags, .. } | Element::Way { tags, .. } => tags,
        }
    }
}

/// Non-fatal findings while shaping a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Street type not found in any lookup table; the value was kept.
    UnmatchedStreetType { id: String, street_type: String },
    /// Postcode without exactly five digits; the value was nulled.
    InvalidPostcode { id: String, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shaped {
    pub element: Element,
    pub diagnostics: Vec<Diagnostic>,
}

/// Returns true if `value` consists of exactly five ASCII digits.
pub fn is_valid_postcode(value: &str) -> bool {
    let value = value.trim();
    value.len() == POSTCODE_DIGITS && value.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Clone, Default)]
pub struct RecordShaper {
    config: Config,
}

impl RecordShaper {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn shape(&self, record: &RawRecord) -> Result<Shaped, ValidationError> {
        let mut diagnostics = Vec::new();
        let id = field(record, "id")?;
        let tags = record
            .tags
            .iter()
            .map(|tag| self.shape_tag(record, tag, &mut diagnostics))
            .collect::<Result<Vec<_>, _>>()?;

        let element = match record.kind {
            ElementKind::Node => Element::Node {
                node: NodeRow {
                    id,
                    lat: field(record, "lat")?,
                    lon: field(record, "lon")?,
                    user: field(record, "user")?,
                    uid: field(record, "uid")?,
                    version: field(record, "version")?,
                    changeset: field(record, "changeset")?,
                    timestamp: field(record, "timestamp")?,
                },
                tags,
            },
            ElementKind::Way => Element::Way {
                nodes: record
                    .node_refs
                    .iter()
                    .enumerate()
                    .map(|(position, node_id)| WayNodeRow {
                        id: id.clone(),
                        node_id: node_id.clone(),
                        position,
                    })
                    .collect(),
                way: WayRow {
                    id,
                    user: field(record, "user")?,
                    uid: field(record, "uid")?,
                    version: field(record, "version")?,
                    changeset: field(record, "changeset")?,
                    timestamp: field(record, "timestamp")?,
                },
                tags,
            },
        };

        Ok(Shaped {
            element,
            diagnostics,
        })
    }

    fn shape_tag(
        &self,
        record: &RawRecord,
        tag: &RawTag,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<TagRow, ValidationError> {
        let missing = |field: &str| ValidationError::Structural {
            kind: record.kind,
            id: record.id().into(),
            field: field.into(),
        };
        let key = tag.key().ok_or_else(|| missing("k"))?;
        let value = tag.value().ok_or_else(|| missing("v"))?;

        let split = split_key(key, &self.config.default_tag_type);
        let namespace = self.config.address_namespace.as_str();
        let value = if split.is(namespace, STREET_KEY) {
            let street = normalize_street(value);
            if street.is_unmatched() {
                let (street_type, _) = split_street(value);
                warn!(
                    "Unmatched street type '{}' in {} {}",
                    street_type,
                    record.kind,
                    record.id()
                );
                diagnostics.push(Diagnostic::UnmatchedStreetType {
                    id: record.id().into(),
                    street_type: street_type.into(),
                });
            }
            Some(street.value)
        } else if split.is(namespace, POSTCODE_KEY) && !is_valid_postcode(value) {
            debug!(
                "Nulled postcode '{}' in {} {}",
                value,
                record.kind,
                record.id()
            );
            diagnostics.push(Diagnostic::InvalidPostcode {
                id: record.id().into(),
                value: value.into(),
            });
            None
        } else {
            Some(value.to_string())
        };

        Ok(TagRow {
            id: record.id().into(),
            key: split.key,
            value,
            tag_type: split.namespace,
        })
    }
}

fn field(record: &RawRecord, name: &str) -> Result<String, ValidationError> {
    record
        .attr(name)
        .map(String::from)
        .ok_or_else(|| ValidationError::Missing {
            kind: record.kind,
            id: record.id().into(),
            field: name.into(),
        })
}

#[cfg(test)]
mod test {
    use super::*;

    fn node() -> RawRecord {
        RawRecord::node("123456789", "41.3851", "2.1734")
            .with_attr("user", "jdoe")
            .with_attr("uid", "12345")
            .with_attr("version", "3")
            .with_attr("changeset", "1234567")
            .with_attr("timestamp", "2016-03-01T12:34:56Z")
            .with_attr("visible", "true")
    }

    fn way() -> RawRecord {
        RawRecord::way("987654321")
            .with_attr("user", "jdoe")
            .with_attr("uid", "12345")
            .with_attr("version", "1")
            .with_attr("changeset", "7654321")
            .with_attr("timestamp", "2016-03-01T12:34:56Z")
    }

    fn tag(id: &str, key: Option<&str>, value: Option<&str>, tag_type: &str) -> TagRow {
        TagRow {
            id: id.into(),
            key: key.map(String::from),
            value: value.map(String::from),
            tag_type: tag_type.into(),
        }
    }

    #[test]
    fn test_node_rows() {
        let record = node()
            .with_tag("amenity", "cafe")
            .with_tag("addr:street", "cl balmes")
            .with_tag("addr:postcode", "08001");
        let shaped = RecordShaper::default().shape(&record).unwrap();
        assert!(shaped.diagnostics.is_empty());

        match shaped.element {
            Element::Node { node, tags } => {
                assert_eq!(
                    node,
                    NodeRow {
                        id: "123456789".into(),
                        lat: "41.3851".into(),
                        lon: "2.1734".into(),
                        user: "jdoe".into(),
                        uid: "12345".into(),
                        version: "3".into(),
                        changeset: "1234567".into(),
                        timestamp: "2016-03-01T12:34:56Z".into(),
                    }
                );
                assert_eq!(
                    tags,
                    vec![
                        tag("123456789", Some("amenity"), Some("cafe"), "regular"),
                        tag("123456789", Some("street"), Some("Carrer Balmes"), "addr"),
                        tag("123456789", Some("postcode"), Some("08001"), "addr"),
                    ]
                );
            }
            _ => panic!("expected a node"),
        }
    }

    #[test]
    fn test_way_rows_keep_order() {
        let record = way()
            .with_node_ref("3")
            .with_node_ref("1")
            .with_node_ref("2")
            .with_tag("highway", "residential")
            .with_tag("name", "Carrer de Mallorca");
        let shaped = RecordShaper::default().shape(&record).unwrap();

        match shaped.element {
            Element::Way { way, nodes, tags } => {
                assert_eq!(way.id, "987654321");
                assert_eq!(way.changeset, "7654321");
                let nodes: Vec<_> = nodes
                    .iter()
                    .map(|n| (n.id.as_str(), n.node_id.as_str(), n.position))
                    .collect();
                assert_eq!(
                    nodes,
                    vec![
                        ("987654321", "3", 0),
                        ("987654321", "1", 1),
                        ("987654321", "2", 2)
                    ]
                );
                assert_eq!(tags.len(), 2);
                assert_eq!(tags[1].value.as_deref(), Some("Carrer de Mallorca"));
            }
            _ => panic!("expected a way"),
        }
    }

    #[test]
    fn test_short_postcode_is_nulled() {
        let record = node().with_tag("addr:postcode", "0801");
        let shaped = RecordShaper::default().shape(&record).unwrap();
        assert_eq!(
            shaped.element.tags(),
            &[tag("123456789", Some("postcode"), None, "addr")][..]
        );
        assert_eq!(
            shaped.diagnostics,
            vec![Diagnostic::InvalidPostcode {
                id: "123456789".into(),
                value: "0801".into()
            }]
        );
    }

    #[test]
    fn test_postcode_outside_address_namespace_is_kept() {
        let record = node().with_tag("postcode", "0801");
        let shaped = RecordShaper::default().shape(&record).unwrap();
        assert_eq!(shaped.element.tags()[0].value.as_deref(), Some("0801"));
        assert!(shaped.diagnostics.is_empty());
    }

    #[test]
    fn test_postcode_check() {
        assert!(is_valid_postcode("08001"));
        assert!(is_valid_postcode(" 08001 "));
        assert!(!is_valid_postcode("0801"));
        assert!(!is_valid_postcode("080011"));
        assert!(!is_valid_postcode("08OO1"));
        assert!(!is_valid_postcode(""));
    }

    #[test]
    fn test_unmatched_street_is_reported() {
        let record = way().with_tag("addr:street", "c/ Balmes");
        let shaped = RecordShaper::default().shape(&record).unwrap();
        assert_eq!(shaped.element.tags()[0].value.as_deref(), Some("c/ Balmes"));
        assert_eq!(
            shaped.diagnostics,
            vec![Diagnostic::UnmatchedStreetType {
                id: "987654321".into(),
                street_type: "c/".into()
            }]
        );
    }

    #[test]
    fn test_unmatched_street_keeps_trailing_space() {
        let record = way().with_tag("addr:street", "c/ ");
        let shaped = RecordShaper::default().shape(&record).unwrap();
        assert_eq!(shaped.element.tags()[0].value.as_deref(), Some("c/ "));
        assert_eq!(shaped.diagnostics.len(), 1);
    }

    #[test]
    fn test_problem_key_keeps_only_default_type() {
        let record = node().with_tag("addr:street name", "avenida diagonal");
        let shaped = RecordShaper::default().shape(&record).unwrap();
        // neither split nor normalized, the original key is not retained
        assert_eq!(
            shaped.element.tags(),
            &[tag("123456789", None, Some("avenida diagonal"), "regular")][..]
        );
    }

    #[test]
    fn test_missing_attribute() {
        let mut record = way();
        record.attributes.retain(|(k, _)| k != "user");
        let err = RecordShaper::default().shape(&record).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Missing {
                kind: ElementKind::Way,
                id: "987654321".into(),
                field: "user".into(),
            }
        );
    }
}
