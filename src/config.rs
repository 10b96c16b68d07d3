//! @ai:module:intent Configuration structs for report annotation
//! @ai:module:layer infrastructure
//! @ai:module:public_api AnnotateConfig, TestReportConfig, LintReportConfig
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::excerpt::{ExcerptRules, ASSERTION_MARKER};
use crate::walker::DEFAULT_FAILURE_MESSAGE;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default file name written by `report-annotate init`.
pub const DEFAULT_CONFIG_FILE: &str = "annotate.toml";

/// @ai:intent Main configuration for both report pipelines
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnnotateConfig {
    #[serde(default)]
    pub test_report: TestReportConfig,
    #[serde(default)]
    pub lint_report: LintReportConfig,
}

/// @ai:intent Settings for the JUnit test-report pipeline
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestReportConfig {
    #[serde(default = "default_assertion_marker")]
    pub assertion_marker: String,
    #[serde(default = "default_tab_width")]
    pub tab_width: usize,
    #[serde(default = "default_message")]
    pub default_message: String,
}

/// @ai:intent Settings for the pylint lint-report pipeline
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LintReportConfig {
    #[serde(default = "default_column")]
    pub default_column: usize,
}

impl Default for TestReportConfig {
    fn default() -> Self {
        Self {
            assertion_marker: default_assertion_marker(),
            tab_width: default_tab_width(),
            default_message: default_message(),
        }
    }
}

impl Default for LintReportConfig {
    fn default() -> Self {
        Self {
            default_column: default_column(),
        }
    }
}

fn default_assertion_marker() -> String {
    ASSERTION_MARKER.to_string()
}

fn default_tab_width() -> usize {
    4
}

fn default_message() -> String {
    DEFAULT_FAILURE_MESSAGE.to_string()
}

fn default_column() -> usize {
    1
}

impl TestReportConfig {
    /// @ai:intent Excerpt rules derived from this configuration
    pub fn excerpt_rules(&self) -> ExcerptRules {
        ExcerptRules {
            assertion_marker: self.assertion_marker.clone(),
            tab_width: self.tab_width,
        }
    }
}

impl AnnotateConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// @ai:intent Load configuration if a path is given, otherwise use defaults
    /// @ai:effects fs:read
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
