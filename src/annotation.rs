//! @ai:module:intent Define the annotation records handed to CI sinks
//! @ai:module:layer domain
//! @ai:module:public_api AnnotationRecord, Location, Severity
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// @ai:intent A file and line recovered from failure text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    pub line: usize,
}

impl Location {
    /// @ai:intent Create a new Location
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

/// @ai:intent Annotation severity as understood by the CI host
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    #[default]
    Notice,
}

impl Severity {
    /// @ai:intent Map a pylint message type onto an annotation severity
    /// @ai:effects pure
    /// @ai:example ("fatal") -> Severity::Error
    /// @ai:example ("convention") -> Severity::Notice
    pub fn from_pylint_type(kind: &str) -> Self {
        match kind {
            "error" | "fatal" => Severity::Error,
            "warning" => Severity::Warning,
            _ => Severity::Notice,
        }
    }

    /// @ai:intent Workflow command name for this severity
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Notice => "notice",
        }
    }
}

/// @ai:intent One line-anchored annotation, produced fresh per failure or lint message
/// @ai:invariant never mutated after construction; ownership moves to the sink
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnnotationRecord {
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    pub body: String,
}
