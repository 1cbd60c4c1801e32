//! The recursive schema-validation engine.
//!
//! One validator per schema level, each a single pass over its mapping's
//! entries in document order. A validator records known fields in a
//! [`FieldTracker`], dispatches value checks, recurses into nested levels,
//! and only after its loop finishes emits one diagnostic per missing
//! required field. Diagnostics never stop traversal; every reachable scope
//! is visited exactly once.

use crate::checks::{self, PodOs, Protocol, QuantityParse};
use crate::diagnostic::Diagnostic;
use crate::tracker::FieldTracker;
use manifest_yaml::{YamlMappingEntry, YamlNode};

const SUPPORTED_API_VERSION: &str = "v1";
const SUPPORTED_KIND: &str = "Pod";
const MIN_CPU: i64 = 1;
const MIN_MEMORY: i64 = 1;

/// Validate parsed manifest documents against the Pod schema.
///
/// Every document in the stream is walked to completion; all findings
/// accumulate into one list in traversal order. Schema violations are the
/// expected, normal result and never become an `Err`.
pub fn validate(documents: &[YamlNode]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for document in documents {
        validate_document(document, &mut diagnostics);
    }
    diagnostics
}

/// Treat anything that is not a mapping as a mapping with no entries, so a
/// scalar in a mapping position surfaces as missing required fields rather
/// than a crash.
fn entries(node: &YamlNode) -> &[YamlMappingEntry] {
    node.as_mapping().unwrap_or(&[])
}

fn elements(node: &YamlNode) -> &[YamlNode] {
    node.as_sequence().unwrap_or(&[])
}

fn emit_missing(tracker: &FieldTracker, diagnostics: &mut Vec<Diagnostic>) {
    for field in tracker.missing_required() {
        diagnostics.push(Diagnostic::required_field(field));
    }
}

fn validate_document(document: &YamlNode, diagnostics: &mut Vec<Diagnostic>) {
    const REQUIRED: &[&str] = &["apiVersion", "kind", "metadata", "spec"];
    let mut tracker = FieldTracker::new(REQUIRED);

    for entry in entries(document) {
        let value = &entry.value;
        let line = entry.key.line;

        match entry.key.scalar_text() {
            "apiVersion" => {
                if value.scalar_text() != SUPPORTED_API_VERSION {
                    diagnostics.push(Diagnostic::unsupported_value(
                        "apiVersion",
                        value.scalar_text(),
                        line,
                    ));
                }
                tracker.mark_seen("apiVersion");
            }
            "kind" => {
                if value.scalar_text() != SUPPORTED_KIND {
                    diagnostics.push(Diagnostic::unsupported_value(
                        "kind",
                        value.scalar_text(),
                        line,
                    ));
                }
                tracker.mark_seen("kind");
            }
            "metadata" => {
                validate_metadata(value, diagnostics);
                tracker.mark_seen("metadata");
            }
            "spec" => {
                validate_spec(value, diagnostics);
                tracker.mark_seen("spec");
            }
            _ => {}
        }
    }

    emit_missing(&tracker, diagnostics);
}

fn validate_metadata(node: &YamlNode, diagnostics: &mut Vec<Diagnostic>) {
    const REQUIRED: &[&str] = &["name"];
    let mut tracker = FieldTracker::new(REQUIRED);

    for entry in entries(node) {
        let value = &entry.value;
        let line = entry.key.line;

        match entry.key.scalar_text() {
            "name" => {
                // Present-but-empty is a required-field violation pointing
                // at the key, not a missing-field one.
                if value.scalar_text().is_empty() {
                    diagnostics.push(Diagnostic::required_field_at("name", line));
                }
                tracker.mark_seen("name");
            }
            "namespace" => {
                tracker.mark_seen("namespace");
            }
            "labels" => {
                validate_labels(value, diagnostics);
                tracker.mark_seen("labels");
            }
            _ => {}
        }
    }

    emit_missing(&tracker, diagnostics);
}

fn validate_labels(node: &YamlNode, diagnostics: &mut Vec<Diagnostic>) {
    for entry in entries(node) {
        if !entry.value.is_scalar() {
            diagnostics.push(Diagnostic::type_mismatch(
                entry.key.scalar_text(),
                "string",
                entry.key.line,
            ));
        }
    }
}

fn validate_spec(node: &YamlNode, diagnostics: &mut Vec<Diagnostic>) {
    const REQUIRED: &[&str] = &["containers"];
    let mut tracker = FieldTracker::new(REQUIRED);

    for entry in entries(node) {
        let value = &entry.value;
        let line = entry.key.line;

        match entry.key.scalar_text() {
            "os" => {
                if PodOs::parse(value.scalar_text()).is_none() {
                    diagnostics.push(Diagnostic::unsupported_value(
                        "os",
                        value.scalar_text(),
                        line,
                    ));
                }
                tracker.mark_seen("os");
            }
            "containers" => {
                for container in elements(value) {
                    validate_container(container, diagnostics);
                }
                tracker.mark_seen("containers");
            }
            _ => {}
        }
    }

    emit_missing(&tracker, diagnostics);
}

fn validate_container(node: &YamlNode, diagnostics: &mut Vec<Diagnostic>) {
    const REQUIRED: &[&str] = &["name", "image", "resources"];
    let mut tracker = FieldTracker::new(REQUIRED);

    for entry in entries(node) {
        let value = &entry.value;
        let line = entry.key.line;

        match entry.key.scalar_text() {
            "name" => {
                let name = value.scalar_text();
                if name.is_empty() {
                    diagnostics.push(Diagnostic::required_field_at("name", line));
                } else if !checks::is_snake_case(name) {
                    diagnostics.push(Diagnostic::invalid_format("name", name, line));
                }
                tracker.mark_seen("name");
            }
            "image" => {
                if !checks::is_image_reference(value.scalar_text()) {
                    diagnostics.push(Diagnostic::invalid_format(
                        "image",
                        value.scalar_text(),
                        line,
                    ));
                }
                tracker.mark_seen("image");
            }
            "ports" => {
                for port in elements(value) {
                    validate_container_port(port, diagnostics);
                }
                tracker.mark_seen("ports");
            }
            "readinessProbe" => {
                validate_probe(value, diagnostics);
                tracker.mark_seen("readinessProbe");
            }
            "livenessProbe" => {
                validate_probe(value, diagnostics);
                tracker.mark_seen("livenessProbe");
            }
            "resources" => {
                validate_resources(value, diagnostics);
                tracker.mark_seen("resources");
            }
            _ => {}
        }
    }

    emit_missing(&tracker, diagnostics);
}

fn validate_container_port(node: &YamlNode, diagnostics: &mut Vec<Diagnostic>) {
    const REQUIRED: &[&str] = &["containerPort"];
    let mut tracker = FieldTracker::new(REQUIRED);

    for entry in entries(node) {
        let value = &entry.value;
        let line = entry.key.line;

        match entry.key.scalar_text() {
            "containerPort" => {
                check_port_value("containerPort", value, line, diagnostics);
                tracker.mark_seen("containerPort");
            }
            "protocol" => {
                if Protocol::parse(value.scalar_text()).is_none() {
                    diagnostics.push(Diagnostic::unsupported_value(
                        "protocol",
                        value.scalar_text(),
                        line,
                    ));
                }
                tracker.mark_seen("protocol");
            }
            _ => {}
        }
    }

    emit_missing(&tracker, diagnostics);
}

/// Shared rule for `containerPort` and probe `port`: the scalar must be
/// integer-tagged, and only then is the range checked.
fn check_port_value(
    field: &'static str,
    value: &YamlNode,
    line: usize,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Some(port) = value.as_i64() else {
        diagnostics.push(Diagnostic::type_mismatch(field, "int", line));
        return;
    };
    if !checks::port_in_range(port) {
        diagnostics.push(Diagnostic::out_of_range(field, line));
    }
}

fn validate_probe(node: &YamlNode, diagnostics: &mut Vec<Diagnostic>) {
    const REQUIRED: &[&str] = &["httpGet"];
    let mut tracker = FieldTracker::new(REQUIRED);

    for entry in entries(node) {
        if entry.key.scalar_text() == "httpGet" {
            validate_http_get(&entry.value, diagnostics);
            tracker.mark_seen("httpGet");
        }
    }

    emit_missing(&tracker, diagnostics);
}

fn validate_http_get(node: &YamlNode, diagnostics: &mut Vec<Diagnostic>) {
    const REQUIRED: &[&str] = &["path", "port"];
    let mut tracker = FieldTracker::new(REQUIRED);

    for entry in entries(node) {
        let value = &entry.value;
        let line = entry.key.line;

        match entry.key.scalar_text() {
            "path" => {
                if !value.scalar_text().starts_with('/') {
                    diagnostics.push(Diagnostic::invalid_format(
                        "path",
                        value.scalar_text(),
                        line,
                    ));
                }
                tracker.mark_seen("path");
            }
            "port" => {
                check_port_value("port", value, line, diagnostics);
                tracker.mark_seen("port");
            }
            _ => {}
        }
    }

    emit_missing(&tracker, diagnostics);
}

fn validate_resources(node: &YamlNode, diagnostics: &mut Vec<Diagnostic>) {
    for entry in entries(node) {
        match entry.key.scalar_text() {
            "requests" | "limits" => {
                validate_resource_declaration(&entry.value, diagnostics);
            }
            _ => {}
        }
    }
}

fn validate_resource_declaration(node: &YamlNode, diagnostics: &mut Vec<Diagnostic>) {
    for entry in entries(node) {
        let value = &entry.value;
        let line = entry.key.line;

        match entry.key.scalar_text() {
            "cpu" => {
                let Some(cpu) = value.as_i64() else {
                    diagnostics.push(Diagnostic::type_mismatch("cpu", "int", line));
                    continue;
                };
                if cpu < MIN_CPU {
                    diagnostics.push(Diagnostic::out_of_range("cpu", line));
                }
            }
            "memory" => match checks::parse_quantity(value.scalar_text()) {
                QuantityParse::Amount(amount) => {
                    if amount < MIN_MEMORY {
                        diagnostics.push(Diagnostic::out_of_range("memory", line));
                    }
                }
                QuantityParse::InvalidFormat => {
                    diagnostics.push(Diagnostic::invalid_format(
                        "memory",
                        value.scalar_text(),
                        line,
                    ));
                }
                QuantityParse::NotAnInteger => {
                    diagnostics.push(Diagnostic::type_mismatch("memory", "int", line));
                }
            },
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticKind;
    use manifest_yaml::parse_documents;

    fn run(content: &str) -> Vec<Diagnostic> {
        validate(&parse_documents(content).unwrap())
    }

    const VALID_MANIFEST: &str = r#"
apiVersion: v1
kind: Pod
metadata:
  name: web
spec:
  containers:
    - name: web
      image: registry.bigbrother.io/team/web:1.0
      resources: {}
"#;

    // ==================== Root ====================

    #[test]
    fn test_valid_manifest_is_clean() {
        assert!(run(VALID_MANIFEST).is_empty());
    }

    #[test]
    fn test_empty_document_reports_all_root_fields() {
        let diagnostics = run("{}");
        let fields: Vec<_> = diagnostics.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["apiVersion", "kind", "metadata", "spec"]);
        assert!(diagnostics.iter().all(|d| d.line.is_none()));
    }

    #[test]
    fn test_scalar_document_reports_all_root_fields() {
        let diagnostics = run("just a string");
        assert_eq!(diagnostics.len(), 4);
    }

    #[test]
    fn test_unsupported_api_version() {
        let diagnostics = run(&VALID_MANIFEST.replace("apiVersion: v1", "apiVersion: v2"));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].field, "apiVersion");
        assert_eq!(
            diagnostics[0].kind,
            DiagnosticKind::UnsupportedValue { value: "v2".into() }
        );
    }

    #[test]
    fn test_unsupported_kind() {
        let diagnostics = run(&VALID_MANIFEST.replace("kind: Pod", "kind: Deployment"));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].field, "kind");
    }

    #[test]
    fn test_unknown_root_keys_are_ignored() {
        let content = format!("{VALID_MANIFEST}status: Running\n");
        assert!(run(&content).is_empty());
    }

    // ==================== Metadata ====================

    #[test]
    fn test_metadata_empty_name_points_at_key() {
        let diagnostics = run(&VALID_MANIFEST.replace("  name: web", "  name: \"\""));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].field, "name");
        assert_eq!(diagnostics[0].kind, DiagnosticKind::RequiredField);
        assert_eq!(diagnostics[0].line, Some(5));
    }

    #[test]
    fn test_metadata_missing_name() {
        let diagnostics = run(&VALID_MANIFEST.replace("  name: web", "  namespace: prod"));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].field, "name");
        assert_eq!(diagnostics[0].line, None);
    }

    #[test]
    fn test_label_values_must_be_scalars() {
        let content = r#"
apiVersion: v1
kind: Pod
metadata:
  name: web
  labels:
    app: web
    tier:
      level: backend
spec:
  containers:
    - name: web
      image: registry.bigbrother.io/team/web:1.0
      resources: {}
"#;
        let diagnostics = run(content);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].field, "tier");
        assert_eq!(
            diagnostics[0].kind,
            DiagnosticKind::TypeMismatch { expected: "string" }
        );
    }

    // ==================== Spec ====================

    #[test]
    fn test_spec_os_enum() {
        let valid = VALID_MANIFEST.replace("spec:", "spec:\n  os: linux");
        assert!(run(&valid).is_empty());

        let invalid = VALID_MANIFEST.replace("spec:", "spec:\n  os: darwin");
        let diagnostics = run(&invalid);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].field, "os");
        assert_eq!(
            diagnostics[0].kind,
            DiagnosticKind::UnsupportedValue {
                value: "darwin".into()
            }
        );
    }

    #[test]
    fn test_spec_missing_containers() {
        let diagnostics = run("apiVersion: v1\nkind: Pod\nmetadata:\n  name: web\nspec:\n  os: linux\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].field, "containers");
        assert_eq!(diagnostics[0].line, None);
    }

    #[test]
    fn test_spec_empty_containers_sequence_is_accepted() {
        let diagnostics = run("apiVersion: v1\nkind: Pod\nmetadata:\n  name: web\nspec:\n  containers: []\n");
        assert!(diagnostics.is_empty());
    }

    // ==================== Container ====================

    #[test]
    fn test_container_name_must_be_snake_case() {
        let diagnostics = run(&VALID_MANIFEST.replace("- name: web", "- name: myContainer"));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].field, "name");
        assert_eq!(
            diagnostics[0].kind,
            DiagnosticKind::InvalidFormat {
                value: "myContainer".into()
            }
        );
    }

    #[test]
    fn test_container_snake_case_name_is_accepted() {
        let diagnostics = run(&VALID_MANIFEST.replace("- name: web", "- name: my_container"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_container_empty_name_skips_format_check() {
        let diagnostics = run(&VALID_MANIFEST.replace("- name: web", "- name: \"\""));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::RequiredField);
        assert!(diagnostics[0].line.is_some());
    }

    #[test]
    fn test_container_image_registry() {
        let diagnostics = run(&VALID_MANIFEST.replace(
            "image: registry.bigbrother.io/team/web:1.0",
            "image: nginx:latest",
        ));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].field, "image");
        assert_eq!(
            diagnostics[0].kind,
            DiagnosticKind::InvalidFormat {
                value: "nginx:latest".into()
            }
        );
    }

    #[test]
    fn test_container_missing_required_fields() {
        let content = r#"
apiVersion: v1
kind: Pod
metadata:
  name: web
spec:
  containers:
    - name: web
"#;
        let diagnostics = run(content);
        let fields: Vec<_> = diagnostics.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["image", "resources"]);
    }

    // ==================== ContainerPort ====================

    #[test]
    fn test_container_port_range() {
        let content = r#"
apiVersion: v1
kind: Pod
metadata:
  name: web
spec:
  containers:
    - name: web
      image: registry.bigbrother.io/team/web:1.0
      ports:
        - containerPort: 70000
      resources: {}
"#;
        let diagnostics = run(content);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].field, "containerPort");
        assert_eq!(diagnostics[0].kind, DiagnosticKind::OutOfRange);
    }

    #[test]
    fn test_container_port_string_is_type_mismatch_only() {
        let content = r#"
apiVersion: v1
kind: Pod
metadata:
  name: web
spec:
  containers:
    - name: web
      image: registry.bigbrother.io/team/web:1.0
      ports:
        - containerPort: "80"
      resources: {}
"#;
        let diagnostics = run(content);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].kind,
            DiagnosticKind::TypeMismatch { expected: "int" }
        );
    }

    #[test]
    fn test_container_port_protocol_enum() {
        let content = r#"
apiVersion: v1
kind: Pod
metadata:
  name: web
spec:
  containers:
    - name: web
      image: registry.bigbrother.io/team/web:1.0
      ports:
        - containerPort: 80
          protocol: SCTP
      resources: {}
"#;
        let diagnostics = run(content);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].field, "protocol");
    }

    #[test]
    fn test_port_entry_missing_container_port() {
        let content = r#"
apiVersion: v1
kind: Pod
metadata:
  name: web
spec:
  containers:
    - name: web
      image: registry.bigbrother.io/team/web:1.0
      ports:
        - protocol: TCP
      resources: {}
"#;
        let diagnostics = run(content);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].field, "containerPort");
        assert_eq!(diagnostics[0].kind, DiagnosticKind::RequiredField);
    }

    // ==================== Probes ====================

    #[test]
    fn test_probe_requires_http_get() {
        let content = r#"
apiVersion: v1
kind: Pod
metadata:
  name: web
spec:
  containers:
    - name: web
      image: registry.bigbrother.io/team/web:1.0
      readinessProbe: {}
      resources: {}
"#;
        let diagnostics = run(content);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].field, "httpGet");
    }

    #[test]
    fn test_http_get_path_and_port() {
        let content = r#"
apiVersion: v1
kind: Pod
metadata:
  name: web
spec:
  containers:
    - name: web
      image: registry.bigbrother.io/team/web:1.0
      livenessProbe:
        httpGet:
          path: healthz
          port: 99999
      resources: {}
"#;
        let diagnostics = run(content);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].field, "path");
        assert_eq!(
            diagnostics[0].kind,
            DiagnosticKind::InvalidFormat {
                value: "healthz".into()
            }
        );
        assert_eq!(diagnostics[1].field, "port");
        assert_eq!(diagnostics[1].kind, DiagnosticKind::OutOfRange);
    }

    #[test]
    fn test_valid_probe_is_clean() {
        let content = r#"
apiVersion: v1
kind: Pod
metadata:
  name: web
spec:
  containers:
    - name: web
      image: registry.bigbrother.io/team/web:1.0
      readinessProbe:
        httpGet:
          path: /healthz
          port: 8080
      resources: {}
"#;
        assert!(run(content).is_empty());
    }

    // ==================== Resources ====================

    #[test]
    fn test_resource_cpu_and_memory() {
        let content = r#"
apiVersion: v1
kind: Pod
metadata:
  name: web
spec:
  containers:
    - name: web
      image: registry.bigbrother.io/team/web:1.0
      resources:
        requests:
          cpu: 0
          memory: 512MB
        limits:
          cpu: two
          memory: 0Mi
"#;
        let diagnostics = run(content);
        assert_eq!(diagnostics.len(), 4);

        assert_eq!(diagnostics[0].field, "cpu");
        assert_eq!(diagnostics[0].kind, DiagnosticKind::OutOfRange);

        assert_eq!(diagnostics[1].field, "memory");
        assert_eq!(
            diagnostics[1].kind,
            DiagnosticKind::InvalidFormat {
                value: "512MB".into()
            }
        );

        assert_eq!(diagnostics[2].field, "cpu");
        assert_eq!(
            diagnostics[2].kind,
            DiagnosticKind::TypeMismatch { expected: "int" }
        );

        assert_eq!(diagnostics[3].field, "memory");
        assert_eq!(diagnostics[3].kind, DiagnosticKind::OutOfRange);
    }

    #[test]
    fn test_valid_resources_are_clean() {
        let content = r#"
apiVersion: v1
kind: Pod
metadata:
  name: web
spec:
  containers:
    - name: web
      image: registry.bigbrother.io/team/web:1.0
      resources:
        requests:
          cpu: 1
          memory: 512Mi
        limits:
          cpu: 2
          memory: 1Gi
"#;
        assert!(run(content).is_empty());
    }

    // ==================== Ordering ====================

    #[test]
    fn test_diagnostics_follow_document_order() {
        let content = r#"
apiVersion: v1
kind: Deployment
metadata:
  name: web
spec:
  containers:
    - name: web
      image: registry.bigbrother.io/team/web:1.0
"#;
        let diagnostics = run(content);
        assert_eq!(diagnostics.len(), 2);
        // kind is checked while iterating the root scope, before the
        // containers recursion reports the missing resources field.
        assert_eq!(diagnostics[0].field, "kind");
        assert_eq!(diagnostics[1].field, "resources");
    }

    #[test]
    fn test_nested_required_fields_precede_parent_scope_check() {
        // The container scope closes (and reports) during the spec loop,
        // before the root scope's own missing fields are reported.
        let content = r#"
spec:
  containers:
    - image: nope
"#;
        let diagnostics = run(content);
        let fields: Vec<_> = diagnostics.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "image",
                "name",
                "resources",
                "apiVersion",
                "kind",
                "metadata"
            ]
        );
    }

    #[test]
    fn test_multiple_documents_accumulate() {
        let content = "kind: Pod\n---\nkind: Pod\n";
        let diagnostics = run(content);
        // Each document is missing apiVersion, metadata, and spec.
        assert_eq!(diagnostics.len(), 6);
    }

    #[test]
    fn test_validation_is_idempotent() {
        let documents = parse_documents(VALID_MANIFEST).unwrap();
        assert_eq!(validate(&documents), validate(&documents));
    }

    #[test]
    fn test_duplicate_keys_both_checked() {
        let content = "apiVersion: v2\napiVersion: v3\nkind: Pod\nmetadata:\n  name: web\nspec:\n  containers: []\n";
        let diagnostics = run(content);
        assert_eq!(diagnostics.len(), 2);
        assert!(
            diagnostics
                .iter()
                .all(|d| d.field == "apiVersion")
        );
    }
}
