//! Diagnostic types for manifest validation.

use serde::Serialize;

/// Structured diagnostic kinds.
///
/// Each kind renders through a fixed template in [`Diagnostic::render`];
/// the variants carry only the data their template substitutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum DiagnosticKind {
    /// A required field is missing, or explicitly present but empty.
    RequiredField,

    /// A field holds a value outside its fixed enumeration or literal.
    UnsupportedValue { value: String },

    /// A string field does not match its required shape.
    InvalidFormat { value: String },

    /// A numeric field lies outside its permitted range.
    OutOfRange,

    /// A field holds a scalar of the wrong type, or a collection where a
    /// scalar belongs.
    TypeMismatch { expected: &'static str },
}

/// One validation finding, immutable once created.
///
/// `line` is absent only for a required field missing from a scope (there
/// is no key to point at); every other kind carries the offending key's
/// source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub field: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,

    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

/// The two path renderings computed once per run from the input file.
///
/// `relative` is the manifest path relative to its own containing
/// directory; `absolute` is the absolutized path. Invalid-format
/// diagnostics render the absolute variant, every other line-bearing kind
/// the relative one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub relative: String,
    pub absolute: String,
}

impl SourcePaths {
    pub fn new(relative: impl Into<String>, absolute: impl Into<String>) -> Self {
        Self {
            relative: relative.into(),
            absolute: absolute.into(),
        }
    }
}

impl Diagnostic {
    /// A required field never seen in its scope.
    pub fn required_field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            line: None,
            kind: DiagnosticKind::RequiredField,
        }
    }

    /// A required field present but empty, pointing at the key itself.
    pub fn required_field_at(field: impl Into<String>, line: usize) -> Self {
        Self {
            field: field.into(),
            line: Some(line),
            kind: DiagnosticKind::RequiredField,
        }
    }

    pub fn unsupported_value(
        field: impl Into<String>,
        value: impl Into<String>,
        line: usize,
    ) -> Self {
        Self {
            field: field.into(),
            line: Some(line),
            kind: DiagnosticKind::UnsupportedValue {
                value: value.into(),
            },
        }
    }

    pub fn invalid_format(
        field: impl Into<String>,
        value: impl Into<String>,
        line: usize,
    ) -> Self {
        Self {
            field: field.into(),
            line: Some(line),
            kind: DiagnosticKind::InvalidFormat {
                value: value.into(),
            },
        }
    }

    pub fn out_of_range(field: impl Into<String>, line: usize) -> Self {
        Self {
            field: field.into(),
            line: Some(line),
            kind: DiagnosticKind::OutOfRange,
        }
    }

    pub fn type_mismatch(field: impl Into<String>, expected: &'static str, line: usize) -> Self {
        Self {
            field: field.into(),
            line: Some(line),
            kind: DiagnosticKind::TypeMismatch { expected },
        }
    }

    /// Render the human-readable message for this diagnostic.
    ///
    /// Invalid-format findings prefix the absolute path; every other
    /// line-bearing kind prefixes the relative path. The asymmetry is
    /// load-bearing for output compatibility.
    pub fn render(&self, paths: &SourcePaths) -> String {
        let prefix = match self.line {
            Some(line) => {
                let path = match self.kind {
                    DiagnosticKind::InvalidFormat { .. } => &paths.absolute,
                    _ => &paths.relative,
                };
                format!("{}:{} ", path, line)
            }
            None => String::new(),
        };

        match &self.kind {
            DiagnosticKind::RequiredField => {
                format!("{}{} is required", prefix, self.field)
            }
            DiagnosticKind::UnsupportedValue { value } => {
                format!("{}{} has unsupported value '{}'", prefix, self.field, value)
            }
            DiagnosticKind::InvalidFormat { value } => {
                format!("{}{} has invalid format '{}'", prefix, self.field, value)
            }
            DiagnosticKind::OutOfRange => {
                format!("{}{} value out of range", prefix, self.field)
            }
            DiagnosticKind::TypeMismatch { expected } => {
                format!("{}{} must be {}", prefix, self.field, expected)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> SourcePaths {
        SourcePaths::new("pod.yaml", "/srv/manifests/pod.yaml")
    }

    #[test]
    fn test_required_field_without_line() {
        let diagnostic = Diagnostic::required_field("spec");
        assert_eq!(diagnostic.render(&paths()), "spec is required");
    }

    #[test]
    fn test_required_field_with_line_uses_relative_path() {
        let diagnostic = Diagnostic::required_field_at("name", 4);
        assert_eq!(diagnostic.render(&paths()), "pod.yaml:4 name is required");
    }

    #[test]
    fn test_unsupported_value() {
        let diagnostic = Diagnostic::unsupported_value("kind", "Deployment", 2);
        assert_eq!(
            diagnostic.render(&paths()),
            "pod.yaml:2 kind has unsupported value 'Deployment'"
        );
    }

    #[test]
    fn test_invalid_format_uses_absolute_path() {
        let diagnostic = Diagnostic::invalid_format("image", "nginx:latest", 9);
        assert_eq!(
            diagnostic.render(&paths()),
            "/srv/manifests/pod.yaml:9 image has invalid format 'nginx:latest'"
        );
    }

    #[test]
    fn test_out_of_range() {
        let diagnostic = Diagnostic::out_of_range("containerPort", 12);
        assert_eq!(
            diagnostic.render(&paths()),
            "pod.yaml:12 containerPort value out of range"
        );
    }

    #[test]
    fn test_type_mismatch() {
        let diagnostic = Diagnostic::type_mismatch("cpu", "int", 15);
        assert_eq!(diagnostic.render(&paths()), "pod.yaml:15 cpu must be int");
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let diagnostic = Diagnostic::unsupported_value("protocol", "SCTP", 7);
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["field"], "protocol");
        assert_eq!(json["line"], 7);
        assert_eq!(json["type"], "UnsupportedValue");
        assert_eq!(json["data"]["value"], "SCTP");
    }
}
