//! YAML parser that builds line-tracked node trees.

use crate::{Error, Result, YamlMappingEntry, YamlNode};
use yaml_rust2::Yaml;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};

/// Parse a YAML stream, producing one root node per document.
///
/// An empty input yields an empty vector. Documents appear in stream
/// order.
///
/// # Example
///
/// ```rust
/// use manifest_yaml::parse_documents;
///
/// let documents = parse_documents("kind: Pod").unwrap();
/// assert_eq!(documents.len(), 1);
/// assert!(documents[0].is_mapping());
/// ```
///
/// # Errors
///
/// Returns an error if the input is not structurally valid YAML.
pub fn parse_documents(content: &str) -> Result<Vec<YamlNode>> {
    let mut parser = Parser::new_from_str(content);
    let mut builder = NodeBuilder::new();

    parser.load(&mut builder, true).map_err(Error::from)?;

    Ok(builder.documents)
}

/// Builder that implements MarkedEventReceiver to construct YamlNode trees.
struct NodeBuilder {
    /// Stack of collections being constructed.
    stack: Vec<BuildNode>,

    /// Completed document roots, in stream order.
    documents: Vec<YamlNode>,
}

/// A collection node being constructed during parsing.
enum BuildNode {
    Sequence {
        line: usize,
        items: Vec<YamlNode>,
    },

    Mapping {
        line: usize,
        entries: Vec<(YamlNode, Option<YamlNode>)>,
    },
}

impl NodeBuilder {
    fn new() -> Self {
        Self {
            stack: Vec::new(),
            documents: Vec::new(),
        }
    }

    fn push_complete(&mut self, node: YamlNode) {
        let Some(parent) = self.stack.last_mut() else {
            // A finished node with no parent is a document root.
            self.documents.push(node);
            return;
        };

        match parent {
            BuildNode::Sequence { items, .. } => {
                items.push(node);
            }
            BuildNode::Mapping { entries, .. } => {
                if let Some((_, value)) = entries.last_mut()
                    && value.is_none()
                {
                    // The previous key is still waiting for its value.
                    *value = Some(node);
                } else {
                    // This node opens a new entry as its key.
                    entries.push((node, None));
                }
            }
        }
    }
}

impl MarkedEventReceiver for NodeBuilder {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        match ev {
            Event::Nothing
            | Event::StreamStart
            | Event::StreamEnd
            | Event::DocumentStart
            | Event::DocumentEnd => {}

            Event::Scalar(value, style, _anchor_id, tag) => {
                let resolved = resolve_scalar(&value, style, tag.as_ref());
                let node = YamlNode::new_scalar(resolved, value, marker.line());
                self.push_complete(node);
            }

            Event::SequenceStart(_anchor_id, _tag) => {
                self.stack.push(BuildNode::Sequence {
                    line: marker.line(),
                    items: Vec::new(),
                });
            }

            Event::SequenceEnd => {
                let Some(BuildNode::Sequence { line, items }) = self.stack.pop() else {
                    unreachable!("SequenceEnd without SequenceStart");
                };
                self.push_complete(YamlNode::new_sequence(items, line));
            }

            Event::MappingStart(_anchor_id, _tag) => {
                self.stack.push(BuildNode::Mapping {
                    line: marker.line(),
                    entries: Vec::new(),
                });
            }

            Event::MappingEnd => {
                let Some(BuildNode::Mapping { line, entries }) = self.stack.pop() else {
                    unreachable!("MappingEnd without MappingStart");
                };

                let entries = entries
                    .into_iter()
                    .map(|(key, value)| {
                        // The scanner always emits a value event for every
                        // key, inserting a null scalar for `key:` alone.
                        let value = value.expect("mapping entry without value");
                        YamlMappingEntry::new(key, value)
                    })
                    .collect();

                self.push_complete(YamlNode::new_mapping(entries, line));
            }

            Event::Alias(_anchor_id) => {
                // Anchors are not tracked; an alias degrades to null.
                let node = YamlNode::new_scalar(Yaml::Null, String::new(), marker.line());
                self.push_complete(node);
            }
        }
    }
}

/// Resolve a scalar to its typed value per the YAML core schema.
///
/// Quoted and block scalars are always strings. An explicit core-schema
/// tag overrides plain-scalar resolution; a value that contradicts its tag
/// becomes `BadValue`, matching yaml-rust2's own loader.
fn resolve_scalar(value: &str, style: TScalarStyle, tag: Option<&Tag>) -> Yaml {
    if style != TScalarStyle::Plain {
        return Yaml::String(value.to_string());
    }

    if let Some(tag) = tag {
        if tag.handle != "tag:yaml.org,2002:" {
            return Yaml::String(value.to_string());
        }
        return match tag.suffix.as_str() {
            "bool" => value
                .parse::<bool>()
                .map_or(Yaml::BadValue, Yaml::Boolean),
            "int" => value
                .parse::<i64>()
                .map_or(Yaml::BadValue, Yaml::Integer),
            "float" => match value.parse::<f64>() {
                Ok(_) => Yaml::Real(value.to_string()),
                Err(_) => Yaml::BadValue,
            },
            "null" => match value {
                "~" | "null" => Yaml::Null,
                _ => Yaml::BadValue,
            },
            _ => Yaml::String(value.to_string()),
        };
    }

    Yaml::from_str(value)
}
