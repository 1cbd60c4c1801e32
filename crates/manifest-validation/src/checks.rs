//! Pure value and format checkers.
//!
//! Everything here is independent of tree structure: enumerations, range
//! checks, and the precompiled string-shape patterns. Patterns are
//! process-wide and read-only after first use.

use once_cell::sync::Lazy;
use regex::Regex;

/// Operating systems a pod may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PodOs {
    Linux,
    Windows,
}

impl PodOs {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "linux" => Some(Self::Linux),
            "windows" => Some(Self::Windows),
            _ => None,
        }
    }
}

/// Transport protocols a container port may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Protocol {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "TCP" => Some(Self::Tcp),
            "UDP" => Some(Self::Udp),
            _ => None,
        }
    }
}

/// Inclusive port range shared by `containerPort` and probe `port`.
pub fn port_in_range(port: i64) -> bool {
    (0..=65535).contains(&port)
}

static IMAGE_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^registry\.bigbrother\.io/(.+):(.+)$").unwrap());

/// Check that an image reference names the company registry, a repository,
/// and a tag.
pub fn is_image_reference(value: &str) -> bool {
    IMAGE_REFERENCE.is_match(value)
}

static UPPER_RUN_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(.)([A-Z][a-z]+)").unwrap());
static LOWER_TO_UPPER: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());

/// Convert a camelCase or PascalCase identifier to lower_snake_case.
pub fn to_snake_case(value: &str) -> String {
    let value = UPPER_RUN_BOUNDARY.replace_all(value, "${1}_${2}");
    let value = LOWER_TO_UPPER.replace_all(&value, "${1}_${2}");
    value.to_lowercase()
}

/// A container name is valid only if it is already in snake_case form.
pub fn is_snake_case(value: &str) -> bool {
    value == to_snake_case(value)
}

static MEMORY_QUANTITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)(Mi|Gi|Ki)$").unwrap());

/// Outcome of parsing a memory quantity string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityParse {
    /// Digits-plus-unit shape, with the parsed amount.
    Amount(i64),
    /// The value does not look like a quantity at all.
    InvalidFormat,
    /// The digit run exists but does not fit an integer.
    NotAnInteger,
}

/// Parse a memory quantity of the form `<digits><Ki|Mi|Gi>`.
pub fn parse_quantity(value: &str) -> QuantityParse {
    let Some(captures) = MEMORY_QUANTITY.captures(value) else {
        return QuantityParse::InvalidFormat;
    };
    match captures[1].parse::<i64>() {
        Ok(amount) => QuantityParse::Amount(amount),
        Err(_) => QuantityParse::NotAnInteger,
    }
}
