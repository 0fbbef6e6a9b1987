use std::fs::{self, File};
use std::path::Path;

use csv::{Writer, WriterBuilder};
use osmrel::config::{NODE_FIELDS, TAG_FIELDS, WAY_FIELDS, WAY_NODE_FIELDS};
use osmrel::Element;
use serde::Serialize;

type Error = Box<dyn std::error::Error>;

pub const NODES_PATH: &str = "node.csv";
pub const NODE_TAGS_PATH: &str = "node_tags.csv";
pub const WAYS_PATH: &str = "way.csv";
pub const WAY_NODES_PATH: &str = "way_nodes.csv";
pub const WAY_TAGS_PATH: &str = "way_tags.csv";

/// Writes shaped elements into one csv file per table.
pub struct CsvSink {
    nodes: Writer<File>,
    node_tags: Writer<File>,
    ways: Writer<File>,
    way_nodes: Writer<File>,
    way_tags: Writer<File>,
}

fn create_table(dir: &Path, name: &str, header: &[&str]) -> Result<Writer<File>, Error> {
    // headers are written explicitly, so that empty tables still have them
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(dir.join(name))?;
    writer.write_record(header)?;
    Ok(writer)
}

fn write_rows<T: Serialize>(writer: &mut Writer<File>, rows: &[T]) -> Result<(), Error> {
    for row in rows {
        writer.serialize(row)?;
    }
    Ok(())
}

impl CsvSink {
    /// Creates the output directory (if needed) and all table files in it.
    pub fn create(dir: &Path) -> Result<Self, Error> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            nodes: create_table(dir, NODES_PATH, &NODE_FIELDS)?,
            node_tags: create_table(dir, NODE_TAGS_PATH, &TAG_FIELDS)?,
            ways: create_table(dir, WAYS_PATH, &WAY_FIELDS)?,
            way_nodes: create_table(dir, WAY_NODES_PATH, &WAY_NODE_FIELDS)?,
            way_tags: create_table(dir, WAY_TAGS_PATH, &TAG_FIELDS)?,
        })
    }

    pub fn write(&mut self, element: &Element) -> Result<(), Error> {
        match element {
            Element::Node { node, tags } => {
                self.nodes.serialize(node)?;
                write_rows(&mut self.node_tags, tags)?;
            }
            Element::Way { way, nodes, tags } => {
                self.ways.serialize(way)?;
                write_rows(&mut self.way_nodes, nodes)?;
                write_rows(&mut self.way_tags, tags)?;
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        for writer in &mut [
            &mut self.nodes,
            &mut self.node_tags,
            &mut self.ways,
            &mut self.way_nodes,
            &mut self.way_tags,
        ] {
            writer.flush()?;
        }
        Ok(())
    }
}
