//! Static configuration: bounding box, reference lengths, schema fields and
//! the street name lookup tables.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;

/// Geographic box in decimal degrees; bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Default for BoundingBox {
    /// Barcelona metropolitan area.
    fn default() -> Self {
        Self {
            min_lat: 41.0,
            max_lat: 41.8,
            min_lon: 1.6,
            max_lon: 2.5,
        }
    }
}

impl BoundingBox {
    pub fn contains_lat(&self, lat: f64) -> bool {
        self.min_lat <= lat && lat <= self.max_lat
    }

    pub fn contains_lon(&self, lon: f64) -> bool {
        self.min_lon <= lon && lon <= self.max_lon
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.contains_lat(lat) && self.contains_lon(lon)
    }
}

/// Expected textual length of the integer attributes.
pub const LENGTH_REFERENCE: [(&str, usize); 4] =
    [("id", 9), ("uid", 5), ("version", 2), ("changeset", 7)];

/// Accepted deviation from `LENGTH_REFERENCE` in both directions.
pub const LENGTH_TOLERANCE: usize = 3;

pub const DEFAULT_TAG_TYPE: &str = "regular";
pub const ADDRESS_NAMESPACE: &str = "addr";
pub const STREET_KEY: &str = "street";
pub const POSTCODE_KEY: &str = "postcode";
pub const POSTCODE_DIGITS: usize = 5;

pub const NODE_FIELDS: [&str; 8] = [
    "id",
    "lat",
    "lon",
    "user",
    "uid",
    "version",
    "changeset",
    "timestamp",
];
pub const WAY_FIELDS: [&str; 6] = ["id", "user", "uid", "version", "changeset", "timestamp"];
pub const TAG_FIELDS: [&str; 4] = ["id", "key", "value", "type"];
pub const WAY_NODE_FIELDS: [&str; 3] = ["id", "node_id", "position"];

/// Run wide settings used by validator and shaper.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bbox: BoundingBox,
    /// Namespace of tags without a colon.
    pub default_tag_type: String,
    /// Namespace holding street and postcode tags.
    pub address_namespace: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bbox: BoundingBox::default(),
            default_tag_type: DEFAULT_TAG_TYPE.into(),
            address_namespace: ADDRESS_NAMESPACE.into(),
        }
    }
}

lazy_static! {
    /// Spanish street types and their Catalan translation.
    pub static ref LANGUAGE_MAPPING: HashMap<&'static str, &'static str> = [
        ("acceso", "Accés"),
        ("avenida", "Avinguda"),
        ("calle", "Carrer"),
        ("camino", "Camí"),
        ("paseo", "Passeig"),
        ("plaza", "Plaça"),
        ("vía", "Via"),
    ]
    .iter()
    .cloned()
    .collect();

    /// Street types already in their canonical form (lower case).
    pub static ref EXPECTED: HashSet<&'static str> = [
        "avinguda",
        "carrer",
        "camí",
        "carretera",
        "gran",
        "parc",
        "passatge",
        "passeig",
        "plaça",
        "rambla",
        "ronda",
        "travessera",
        "via",
    ]
    .iter()
    .cloned()
    .collect();

    /// Abbreviations and common misspellings of street types.
    pub static ref ABBREVIATIONS: HashMap<&'static str, &'static str> = [
        ("av", "Avinguda"),
        ("av.", "Avinguda"),
        ("c", "Carrer"),
        ("c.", "Carrer"),
        ("carrar", "Carrer"),
        ("carrerde", "Carrer"),
        ("carrerl", "Carrer"),
        ("cl", "Carrer"),
        ("cr", "Carrer"),
        ("ctra", "Carretera"),
        ("ctra.", "Carretera"),
        ("pg.", "Passeig"),
        ("pg", "Passeig"),
        ("pas", "Passeig"),
        ("pl.", "Plaça"),
        ("pl", "Plaça"),
        ("pla", "Plaça"),
        ("rembla", "Rambla"),
    ]
    .iter()
    .cloned()
    .collect();

    /// Words kept in lower case when title-casing a street name.
    pub static ref CONNECTOR_WORDS: HashSet<&'static str> =
        ["de", "del", "la", "el", "i"].iter().cloned().collect();
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_bbox() {
        let bbox = BoundingBox::default();
        assert!(bbox.contains(41.0, 1.6));
        assert!(bbox.contains(41.8, 2.5));
        assert!(bbox.contains(41.39, 2.17));
        assert!(!bbox.contains(42.9, 2.17));
        assert!(!bbox.contains(41.39, 2.6));
        assert!(!bbox.contains(f64::NAN, 2.0));
    }

    #[test]
    fn test_tables_are_disjoint() {
        for key in LANGUAGE_MAPPING.keys() {
            assert!(!EXPECTED.contains(key), "{}", key);
            assert!(!ABBREVIATIONS.contains_key(key), "{}", key);
        }
        for key in ABBREVIATIONS.keys() {
            assert!(!EXPECTED.contains(key), "{}", key);
        }
        for value in LANGUAGE_MAPPING.values().chain(ABBREVIATIONS.values()) {
            if *value != "Accés" {
                assert!(EXPECTED.contains(value.to_lowercase().as_str()), "{}", value);
            }
        }
    }
}
