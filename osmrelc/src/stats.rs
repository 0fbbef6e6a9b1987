use std::fmt;
use std::ops::AddAssign;

use osmrel::{Diagnostic, Element, Shaped};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub num_nodes: usize,
    pub num_ways: usize,
    pub num_node_tags: usize,
    pub num_way_tags: usize,
    pub num_way_nodes: usize,
    pub num_unmatched_street_types: usize,
    pub num_invalid_postcodes: usize,
}

impl From<&Shaped> for Stats {
    fn from(shaped: &Shaped) -> Self {
        let mut stats = match &shaped.element {
            Element::Node { tags, .. } => Stats {
                num_nodes: 1,
                num_node_tags: tags.len(),
                ..Default::default()
            },
            Element::Way { nodes, tags, .. } => Stats {
                num_ways: 1,
                num_way_tags: tags.len(),
                num_way_nodes: nodes.len(),
                ..Default::default()
            },
        };
        for diagnostic in &shaped.diagnostics {
            match diagnostic {
                Diagnostic::UnmatchedStreetType { .. } => stats.num_unmatched_street_types += 1,
                Diagnostic::InvalidPostcode { .. } => stats.num_invalid_postcodes += 1,
            }
        }
        stats
    }
}

impl AddAssign for Stats {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.num_nodes += other.num_nodes;
        self.num_ways += other.num_ways;
        self.num_node_tags += other.num_node_tags;
        self.num_way_tags += other.num_way_tags;
        self.num_way_nodes += other.num_way_nodes;
        self.num_unmatched_street_types += other.num_unmatched_street_types;
        self.num_invalid_postcodes += other.num_invalid_postcodes;
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(
            f,
            r#"Converted:
  nodes:        {}
  node tags:    {}
  ways:         {}
  way tags:     {}
  way nodes:    {}
Diagnostics:
  unmatched street types: {}
  nulled postcodes:       {}"#,
            self.num_nodes,
            self.num_node_tags,
            self.num_ways,
            self.num_way_tags,
            self.num_way_nodes,
            self.num_unmatched_street_types,
            self.num_invalid_postcodes
        )
    }
}
