//! @ai:module:intent Turn every failure in a test report into one annotation record
//! @ai:module:layer application
//! @ai:module:public_api ReportWalker, DEFAULT_FAILURE_MESSAGE
//! @ai:module:depends_on report, location, excerpt, annotation, config
//! @ai:module:stateless true

use crate::annotation::{AnnotationRecord, Severity};
use crate::config::TestReportConfig;
use crate::excerpt::{extract_assertion_block_with, ExcerptRules};
use crate::location::{FsProbe, LocationExtractor, PathProbe};
use crate::report::{Failure, Report, TestCase};

/// Used when a failure carries neither body text nor a message attribute.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Test failed";

/// @ai:intent Walks suites, cases and failures in document order
pub struct ReportWalker<P> {
    locator: LocationExtractor<P>,
    rules: ExcerptRules,
    default_message: String,
}

impl ReportWalker<FsProbe> {
    /// @ai:intent Create a walker that checks traceback paths against the working directory
    pub fn with_filesystem() -> Self {
        Self::new(LocationExtractor::with_filesystem())
    }
}

impl<P: PathProbe> ReportWalker<P> {
    /// @ai:intent Create a walker with default excerpt rules
    pub fn new(locator: LocationExtractor<P>) -> Self {
        Self {
            locator,
            rules: ExcerptRules::default(),
            default_message: DEFAULT_FAILURE_MESSAGE.to_string(),
        }
    }

    /// @ai:intent Apply test-report settings from configuration
    pub fn with_config(mut self, config: &TestReportConfig) -> Self {
        self.rules = config.excerpt_rules();
        self.default_message = config.default_message.clone();
        self
    }

    /// @ai:intent Produce one annotation per failure or error entry
    /// @ai:post output order matches document order
    /// @ai:post result length equals report.failure_count()
    /// @ai:effects fs:read (through the path probe)
    pub fn walk(&self, report: &Report) -> Vec<AnnotationRecord> {
        report
            .suites
            .iter()
            .flat_map(|suite| &suite.cases)
            .flat_map(|case| case.non_passing().map(move |failure| (case, failure)))
            .map(|(case, failure)| self.annotate(case, failure))
            .collect()
    }

    /// @ai:intent Build the annotation for a single failure
    /// @ai:post location falls back to the declared case location when traceback has none
    /// @ai:effects fs:read (through the path probe)
    pub fn annotate(&self, case: &TestCase, failure: &Failure) -> AnnotationRecord {
        let message = failure.message().unwrap_or(self.default_message.trim());

        let (file, line) = match self.locator.extract(message, case.file.as_deref()) {
            Some(loc) => (Some(loc.file), Some(loc.line)),
            None => (case.file.clone(), case.line),
        };

        let title = failure_title(case);
        tracing::debug!(
            "{},{},{},{},{:?}",
            file.as_deref().unwrap_or(""),
            line.map(|l| l.to_string()).unwrap_or_default(),
            case.classname.as_deref().unwrap_or(""),
            case.name,
            message
        );

        AnnotationRecord {
            severity: Severity::Error,
            title: Some(title),
            file,
            line,
            column: None,
            body: extract_assertion_block_with(message, &self.rules),
        }
    }
}

/// @ai:intent Format the annotation title from class and test name
/// @ai:example (classname="tests.test_x", name="test_eq") -> "Failed tests.test_x:test_eq"
/// @ai:effects pure
fn failure_title(case: &TestCase) -> String {
    match case.classname.as_deref().filter(|c| !c.is_empty()) {
        Some(classname) => format!("Failed {}:{}", classname, case.name),
        None => format!("Failed {}", case.name),
    }
}
