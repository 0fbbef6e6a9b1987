use std::fmt;

/// Kind of an OSM element handled by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementKind {
    Node,
    Way,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Node => "node",
            ElementKind::Way => "way",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `<tag>` child exactly as it appeared in the input.
///
/// All attributes are kept (not only `k` and `v`), since a tag carrying
/// additional attributes is malformed and has to be detectable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTag {
    pub attributes: Vec<(String, String)>,
}

impl RawTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attributes: vec![("k".into(), key.into()), ("v".into(), value.into())],
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        find_attr(&self.attributes, name)
    }

    pub fn key(&self) -> Option<&str> {
        self.attr("k")
    }

    pub fn value(&self) -> Option<&str> {
        self.attr("v")
    }
}

/// A node or a way with its attributes, tags and (for ways) node references.
///
/// Attributes are raw strings in document order; nothing is parsed until the
/// record is validated or shaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub kind: ElementKind,
    pub attributes: Vec<(String, String)>,
    pub tags: Vec<RawTag>,
    pub node_refs: Vec<String>,
}

impl RawRecord {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            attributes: Vec::new(),
            tags: Vec::new(),
            node_refs: Vec::new(),
        }
    }

    /// Creates a node with the usual set of OSM attributes.
    pub fn node(id: &str, lat: &str, lon: &str) -> Self {
        Self::new(ElementKind::Node)
            .with_attr("id", id)
            .with_attr("lat", lat)
            .with_attr("lon", lon)
    }

    pub fn way(id: &str) -> Self {
        Self::new(ElementKind::Way).with_attr("id", id)
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push(RawTag::new(key, value));
        self
    }

    pub fn with_node_ref(mut self, node_ref: impl Into<String>) -> Self {
        self.node_refs.push(node_ref.into());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        find_attr(&self.attributes, name)
    }

    /// Raw `id` attribute, used to identify the record in errors.
    pub fn id(&self) -> &str {
        self.attr("id").unwrap_or("<unknown>")
    }
}

fn find_attr<'a>(attributes: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}
