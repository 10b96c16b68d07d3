//! @ai:module:intent Run a report file through parsing, extraction and the annotation sink
//! @ai:module:layer application
//! @ai:module:public_api publish_test_report, publish_lint_report
//! @ai:module:depends_on junit, walker, lint, output, config, error

use crate::config::LintReportConfig;
use crate::error::Result;
use crate::junit::load_report;
use crate::lint::{lint_annotations, load_lint_report};
use crate::location::PathProbe;
use crate::output::AnnotationSink;
use crate::walker::ReportWalker;
use std::path::Path;

/// @ai:intent Publish one annotation per failing test case in a JUnit report
/// @ai:pre path points at a JUnit XML document
/// @ai:post nothing reaches the sink unless the whole document parsed
/// @ai:post returns the number of annotations published
/// @ai:effects fs:read, io
pub fn publish_test_report<P: PathProbe>(
    path: &Path,
    walker: &ReportWalker<P>,
    sink: &mut dyn AnnotationSink,
) -> Result<usize> {
    let report = load_report(path)?;

    if report.is_empty() {
        sink.info("No <testsuite> elements found in report.")?;
        return Ok(0);
    }

    let records = walker.walk(&report);
    for record in &records {
        sink.annotate(record)?;
    }

    sink.info(&format!(
        "Published {} annotations from {}",
        records.len(),
        path.display()
    ))?;
    Ok(records.len())
}

/// @ai:intent Publish one annotation per pylint message
/// @ai:effects fs:read, io
pub fn publish_lint_report(
    path: &Path,
    config: &LintReportConfig,
    sink: &mut dyn AnnotationSink,
) -> Result<usize> {
    let messages = load_lint_report(path)?;
    let records = lint_annotations(&messages, config);

    for record in &records {
        sink.annotate(record)?;
    }

    tracing::info!("Published {} lint annotations from {}", records.len(), path.display());
    Ok(records.len())
}
