//! @ai:module:intent Turn test and lint reports into line-anchored CI annotations
//! @ai:module:layer infrastructure
//! @ai:module:public_api annotation, config, error, excerpt, junit, lint, location, output, pipeline, report, walker
//! @ai:module:stateless true
//!
//! # report-annotate
//!
//! Reads a pytest JUnit XML report or a pylint JSON report and emits one CI
//! annotation per failure or lint message.
//!
//! For test reports the line declared on a `<testcase>` is where the test is
//! defined, so the failure site is recovered from the traceback instead, and the
//! annotation body is trimmed down to the `E`-prefixed assertion block.
//!
//! ## Example
//!
//! ```rust,no_run
//! use report_annotate::{junit, output, ReportWalker};
//! use std::path::Path;
//!
//! let report = junit::load_report(Path::new("report.xml")).unwrap();
//! for record in ReportWalker::with_filesystem().walk(&report) {
//!     println!("{}", output::format_workflow_command(&record));
//! }
//! ```

pub mod annotation;
pub mod config;
pub mod error;
pub mod excerpt;
pub mod junit;
pub mod lint;
pub mod location;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod walker;

pub use annotation::{AnnotationRecord, Location, Severity};
pub use config::{AnnotateConfig, LintReportConfig, TestReportConfig};
pub use error::{Error, Result};
pub use excerpt::{extract_assertion_block, preserve_indent, ExcerptRules};
pub use junit::{load_report, parse_report};
pub use lint::{lint_annotations, load_lint_report, parse_lint_report, LintMessage};
pub use location::{FixedPaths, FsProbe, LocationExtractor, PathProbe};
pub use output::{create_sink, AnnotationSink, OutputFormat};
pub use pipeline::{publish_lint_report, publish_test_report};
pub use report::{Failure, FailureKind, Report, TestCase, TestSuite};
pub use walker::ReportWalker;
