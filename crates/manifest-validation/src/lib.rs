//! # manifest-validation
//!
//! Schema validation for Pod manifests.
//!
//! The engine walks parsed [`manifest_yaml::YamlNode`] trees and checks
//! them against a single fixed schema: required fields per level, literal
//! and enumerated values, numeric ranges, and string formats. It is a
//! best-effort linter, not a fail-fast parser: every violation becomes one
//! [`Diagnostic`] and traversal always covers the whole tree.
//!
//! ## Example
//!
//! ```rust,no_run
//! use manifest_validation::{SourcePaths, validate};
//! use manifest_yaml::parse_documents;
//!
//! let documents = parse_documents("kind: Pod").unwrap();
//! let paths = SourcePaths::new("pod.yaml", "/srv/pod.yaml");
//! for diagnostic in validate(&documents) {
//!     println!("{}", diagnostic.render(&paths));
//! }
//! ```

mod checks;
mod diagnostic;
mod tracker;
mod validator;

pub use diagnostic::{Diagnostic, DiagnosticKind, SourcePaths};
pub use tracker::FieldTracker;
pub use validator::validate;
