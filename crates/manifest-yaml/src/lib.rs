//! # manifest-yaml
//!
//! YAML parsing with source line tracking.
//!
//! This crate provides [`YamlNode`], an owned YAML tree where every node
//! carries its typed `yaml-rust2` value, the raw scalar text as written in
//! the source, and the 1-based line it starts on. A manifest file may hold
//! several documents; [`parse_documents`] returns one root node per
//! document, in stream order.
//!
//! Consumers walk the tree read-only; the parser is the only writer.
//!
//! ## Example
//!
//! ```rust,no_run
//! use manifest_yaml::parse_documents;
//!
//! let content = r#"
//! kind: Pod
//! metadata:
//!   name: web
//! "#;
//!
//! let documents = parse_documents(content).unwrap();
//! if let Some(kind) = documents[0].get("kind") {
//!     println!("kind declared on line {}", kind.line);
//! }
//! ```

mod error;
mod node;
mod parser;

pub use error::{Error, Result};
pub use node::{YamlMappingEntry, YamlNode};
pub use parser::parse_documents;
