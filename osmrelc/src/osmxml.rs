use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str;

use log::trace;
use osmrel::{ElementKind, RawRecord, RawTag};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

type Error = Box<dyn std::error::Error>;

/// Streams nodes and ways out of an OSM xml file.
///
/// Records are produced one at a time in document order, with their tags and
/// node references attached. Relations are skipped.
pub struct OsmXmlReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    current: Option<RawRecord>,
    finished: bool,
}

impl OsmXmlReader<BufReader<File>> {
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> OsmXmlReader<R> {
    pub fn new(reader: R) -> Self {
        let mut reader = Reader::from_reader(reader);
        reader.trim_text(true);
        Self {
            reader,
            buf: Vec::new(),
            current: None,
            finished: false,
        }
    }

    /// Number of bytes consumed from the input so far.
    pub fn position(&self) -> usize {
        self.reader.buffer_position()
    }

    fn read_next(&mut self) -> Result<Option<RawRecord>, Error> {
        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Eof => return Ok(None),
                Event::Start(e) => match e.name().as_ref() {
                    b"node" => self.current = Some(read_record(ElementKind::Node, &e)?),
                    b"way" => self.current = Some(read_record(ElementKind::Way, &e)?),
                    b"tag" | b"nd" => add_child(&mut self.current, &e)?,
                    _ => {}
                },
                Event::Empty(e) => match e.name().as_ref() {
                    b"node" => return Ok(Some(read_record(ElementKind::Node, &e)?)),
                    b"way" => return Ok(Some(read_record(ElementKind::Way, &e)?)),
                    b"tag" | b"nd" => add_child(&mut self.current, &e)?,
                    _ => {}
                },
                Event::End(e) => match e.name().as_ref() {
                    b"node" | b"way" => {
                        if let Some(record) = self.current.take() {
                            return Ok(Some(record));
                        }
                    }
                    _ => {}
                },
                _ => {}
            }
        }
    }
}

impl<R: BufRead> Iterator for OsmXmlReader<R> {
    type Item = Result<RawRecord, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.read_next().transpose();
        if !matches!(result, Some(Ok(_))) {
            self.finished = true;
        }
        result
    }
}

fn read_attributes(event: &BytesStart<'_>) -> Result<Vec<(String, String)>, Error> {
    let mut attributes = Vec::new();
    for attr in event.attributes().with_checks(false) {
        let attr = attr?;
        let key = str::from_utf8(attr.key.as_ref())?.to_string();
        attributes.push((key, attr.unescape_value()?.into_owned()));
    }
    Ok(attributes)
}

fn read_record(kind: ElementKind, event: &BytesStart<'_>) -> Result<RawRecord, Error> {
    let record = RawRecord {
        attributes: read_attributes(event)?,
        ..RawRecord::new(kind)
    };
    trace!("Read {} {}", kind, record.id());
    Ok(record)
}

/// Attaches a `<tag>` or `<nd>` to the element being read; children of
/// skipped elements are ignored.
fn add_child(current: &mut Option<RawRecord>, event: &BytesStart<'_>) -> Result<(), Error> {
    let record = match current {
        Some(record) => record,
        None => return Ok(()),
    };
    let attributes = read_attributes(event)?;
    if event.name().as_ref() == b"tag" {
        record.tags.push(RawTag { attributes });
    } else if record.kind == ElementKind::Way {
        let node_ref = attributes
            .into_iter()
            .find(|(k, _)| k == "ref")
            .map(|(_, v)| v)
            .ok_or_else(|| format!("<nd> without ref in way {}", record.id()))?;
        record.node_refs.push(node_ref);
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    const OSM_SAMPLE: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<osm version="0.6" generator="test">
  <bounds minlat="41.0" minlon="1.6" maxlat="41.8" maxlon="2.5"/>
  <node id="100000001" lat="41.3851" lon="2.1734" user="jdoe"/>
  <node id="100000002" lat="41.3900" lon="2.1600" user="jdoe">
    <tag k="name" v="Bar &amp; Grill"/>
    <tag k="addr:street" v="calle Mallorca" lang="es"/>
  </node>
  <way id="200000001" user="anna">
    <nd ref="100000002"/>
    <nd ref="100000001"/>
    <tag k="highway" v="residential"/>
  </way>
  <relation id="300000001">
    <member type="way" ref="200000001" role="outer"/>
    <tag k="type" v="multipolygon"/>
  </relation>
  <way id="200000002"/>
</osm>
"#;

    fn read(xml: &str) -> Vec<RawRecord> {
        OsmXmlReader::new(xml.as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_read_records() {
        let records = read(OSM_SAMPLE);
        assert_eq!(records.len(), 4);

        assert_eq!(
            records[0],
            RawRecord::node("100000001", "41.3851", "2.1734").with_attr("user", "jdoe")
        );

        let node = &records[1];
        assert_eq!(node.kind, ElementKind::Node);
        assert_eq!(node.tags.len(), 2);
        assert_eq!(node.tags[0].value(), Some("Bar & Grill"));
        // all attributes are kept for validation
        assert_eq!(node.tags[1].attributes.len(), 3);
        assert_eq!(node.tags[1].attr("lang"), Some("es"));

        let way = &records[2];
        assert_eq!(way.kind, ElementKind::Way);
        assert_eq!(way.node_refs, vec!["100000002", "100000001"]);
        assert_eq!(way.tags, vec![RawTag::new("highway", "residential")]);

        // tags of the relation are not attached to anything
        assert_eq!(records[3], RawRecord::way("200000002"));
    }

    #[test]
    fn test_position_advances() {
        let mut reader = OsmXmlReader::new(OSM_SAMPLE.as_bytes());
        assert_eq!(reader.position(), 0);
        reader.next().unwrap().unwrap();
        let first = reader.position();
        assert!(first > 0);
        reader.next().unwrap().unwrap();
        assert!(reader.position() > first);
    }

    #[test]
    fn test_nd_without_ref() {
        let xml = r#"<osm><way id="1"><nd/></way><way id="2"/></osm>"#;
        let mut reader = OsmXmlReader::new(xml.as_bytes());
        let err = reader.next().unwrap().unwrap_err();
        assert_eq!(err.to_string(), "<nd> without ref in way 1");
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_malformed_xml() {
        let xml = r#"<osm><node id="1"></way></osm>"#;
        let results: Vec<_> = OsmXmlReader::new(xml.as_bytes()).collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }
}
