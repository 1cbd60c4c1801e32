//! YAML node with source line tracking.

use yaml_rust2::Yaml;

/// One position in a parsed YAML document.
///
/// A node is a scalar, a mapping, or a sequence. Scalars keep both the
/// resolved [`Yaml`] value (so callers can tell an integer-tagged scalar
/// from a quoted string) and the raw text as it appeared in the source.
/// Mappings keep their entries in document order; they are never
/// alphabetized or deduplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct YamlNode {
    /// 1-based source line the node starts on.
    pub line: usize,

    content: Content,
}

#[derive(Debug, Clone, PartialEq)]
enum Content {
    Scalar {
        /// Resolved value per the YAML core schema.
        value: Yaml,
        /// The scalar text exactly as written (unquoted).
        raw: String,
    },
    Sequence(Vec<YamlNode>),
    Mapping(Vec<YamlMappingEntry>),
}

/// A key/value pair in a mapping, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct YamlMappingEntry {
    pub key: YamlNode,
    pub value: YamlNode,
}

impl YamlNode {
    pub(crate) fn new_scalar(value: Yaml, raw: String, line: usize) -> Self {
        Self {
            line,
            content: Content::Scalar { value, raw },
        }
    }

    pub(crate) fn new_sequence(items: Vec<YamlNode>, line: usize) -> Self {
        Self {
            line,
            content: Content::Sequence(items),
        }
    }

    pub(crate) fn new_mapping(entries: Vec<YamlMappingEntry>, line: usize) -> Self {
        Self {
            line,
            content: Content::Mapping(entries),
        }
    }

    /// Check if this is a scalar value (not a mapping or sequence).
    pub fn is_scalar(&self) -> bool {
        matches!(self.content, Content::Scalar { .. })
    }

    /// Check if this is a mapping.
    pub fn is_mapping(&self) -> bool {
        matches!(self.content, Content::Mapping(_))
    }

    /// Check if this is a sequence.
    pub fn is_sequence(&self) -> bool {
        matches!(self.content, Content::Sequence(_))
    }

    /// The resolved scalar value, if this is a scalar.
    pub fn scalar(&self) -> Option<&Yaml> {
        match &self.content {
            Content::Scalar { value, .. } => Some(value),
            _ => None,
        }
    }

    /// The scalar text exactly as written in the source.
    ///
    /// Mappings and sequences render as the empty string, which is what the
    /// literal-comparison rules expect when a collection shows up where a
    /// scalar belongs.
    pub fn scalar_text(&self) -> &str {
        match &self.content {
            Content::Scalar { raw, .. } => raw,
            _ => "",
        }
    }

    /// True when the scalar resolved to an integer under the core schema.
    pub fn is_integer(&self) -> bool {
        matches!(self.scalar(), Some(Yaml::Integer(_)))
    }

    /// The integer value, if this scalar resolved to one.
    pub fn as_i64(&self) -> Option<i64> {
        match self.scalar() {
            Some(Yaml::Integer(n)) => Some(*n),
            _ => None,
        }
    }

    /// Mapping entries in document order, if this is a mapping.
    pub fn as_mapping(&self) -> Option<&[YamlMappingEntry]> {
        match &self.content {
            Content::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Sequence elements, if this is a sequence.
    pub fn as_sequence(&self) -> Option<&[YamlNode]> {
        match &self.content {
            Content::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a mapping value by key text.
    ///
    /// Returns the first entry whose key matches. `None` if this is not a
    /// mapping or the key is absent.
    pub fn get(&self, key: &str) -> Option<&YamlNode> {
        match &self.content {
            Content::Mapping(entries) => entries
                .iter()
                .find(|entry| entry.key.scalar_text() == key)
                .map(|entry| &entry.value),
            _ => None,
        }
    }

    /// Number of children (sequence length or mapping entry count).
    pub fn len(&self) -> usize {
        match &self.content {
            Content::Scalar { .. } => 0,
            Content::Sequence(items) => items.len(),
            Content::Mapping(entries) => entries.len(),
        }
    }

    /// Check if this node has no children.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl YamlMappingEntry {
    pub(crate) fn new(key: YamlNode, value: YamlNode) -> Self {
        Self { key, value }
    }
}
