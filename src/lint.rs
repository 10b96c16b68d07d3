//! @ai:module:intent Map pylint JSON messages one-to-one onto annotations
//! @ai:module:layer application
//! @ai:module:public_api LintMessage, load_lint_report, parse_lint_report, lint_annotations
//! @ai:module:depends_on annotation, config, error
//! @ai:module:stateless true

use crate::annotation::{AnnotationRecord, Severity};
use crate::config::LintReportConfig;
use crate::error::{read_input, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// @ai:intent A single message from `pylint --output-format=json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LintMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub path: String,
    pub line: usize,
    #[serde(default)]
    pub column: Option<usize>,
    pub message: String,
    #[serde(default)]
    pub symbol: Option<String>,
}

impl LintMessage {
    /// @ai:intent Message text with the pylint symbol appended when present
    /// @ai:example (message="Unused import os", symbol="unused-import") -> "Unused import os (unused-import)"
    pub fn display_text(&self) -> String {
        match self.symbol.as_deref().filter(|s| !s.is_empty()) {
            Some(symbol) => format!("{} ({})", self.message, symbol),
            None => self.message.clone(),
        }
    }
}

/// @ai:intent Load and parse a pylint JSON report from disk
/// @ai:effects fs:read
pub fn load_lint_report(path: &Path) -> Result<Vec<LintMessage>> {
    let json = read_input(path)?;
    parse_lint_report_named(&json, &path.display().to_string())
}

/// @ai:intent Parse pylint JSON text
/// @ai:effects pure
pub fn parse_lint_report(json: &str) -> Result<Vec<LintMessage>> {
    parse_lint_report_named(json, "<input>")
}

fn parse_lint_report_named(json: &str, origin: &str) -> Result<Vec<LintMessage>> {
    serde_json::from_str(json).map_err(|e| Error::InvalidJson {
        origin: origin.to_string(),
        source: e,
    })
}

/// @ai:intent Convert lint messages into annotations
/// @ai:post one record per message, in input order
/// @ai:effects pure
pub fn lint_annotations(messages: &[LintMessage], config: &LintReportConfig) -> Vec<AnnotationRecord> {
    messages
        .iter()
        .map(|msg| AnnotationRecord {
            severity: Severity::from_pylint_type(&msg.kind),
            title: None,
            file: Some(msg.path.clone()),
            line: Some(msg.line),
            column: Some(msg.column.unwrap_or(config.default_column)),
            body: msg.display_text(),
        })
        .collect()
}
