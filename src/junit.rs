//! @ai:module:intent Parse JUnit XML reports into the read-only report model
//! @ai:module:layer infrastructure
//! @ai:module:public_api load_report, parse_report, parse_report_named
//! @ai:module:depends_on report, error
//! @ai:module:stateless true

use crate::error::{read_input, Error, Result};
use crate::report::{Failure, FailureKind, Report, TestCase, TestSuite};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RawSuites {
    #[serde(rename = "testsuite", default)]
    suites: Vec<RawSuite>,
}

#[derive(Debug, Deserialize)]
struct RawSuite {
    #[serde(rename = "@name", default)]
    name: Option<String>,
    #[serde(rename = "testcase", default)]
    cases: Vec<RawCase>,
}

#[derive(Debug, Deserialize)]
struct RawCase {
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@classname", default)]
    classname: Option<String>,
    #[serde(rename = "@file", default)]
    file: Option<String>,
    #[serde(rename = "@line", default)]
    line: Option<String>,
    #[serde(rename = "failure", default)]
    failures: Vec<RawFailure>,
    #[serde(rename = "error", default)]
    errors: Vec<RawFailure>,
}

#[derive(Debug, Deserialize)]
struct RawFailure {
    #[serde(rename = "@message", default)]
    message: Option<String>,
    #[serde(rename = "@type", default)]
    kind: Option<String>,
    #[serde(rename = "$text", default)]
    text: Option<String>,
}

/// @ai:intent Load and parse a JUnit XML report from disk
/// @ai:pre path points at a JUnit XML document
/// @ai:effects fs:read
pub fn load_report(path: &Path) -> Result<Report> {
    let xml = read_input(path)?;
    parse_report_named(&xml, &path.display().to_string())
}

/// @ai:intent Parse JUnit XML text into a Report
/// @ai:effects pure
pub fn parse_report(xml: &str) -> Result<Report> {
    parse_report_named(xml, "<input>")
}

/// @ai:intent Parse JUnit XML text, naming the origin in any error
/// @ai:post a `testsuites` root yields its children, a `testsuite` root yields one suite,
///          any other root yields an empty report
/// @ai:effects pure
pub fn parse_report_named(xml: &str, origin: &str) -> Result<Report> {
    let root = root_element(xml, origin)?;
    tracing::debug!("{} has root element <{}>", origin, root);

    let suites = match root.as_str() {
        "testsuites" => deserialize::<RawSuites>(xml, origin)?.suites,
        "testsuite" => vec![deserialize::<RawSuite>(xml, origin)?],
        _ => Vec::new(),
    };

    Ok(Report {
        suites: suites.into_iter().map(convert_suite).collect(),
    })
}

/// @ai:intent Walk every event so the whole document is checked before anything is built
/// @ai:post returns the root element name of a well-formed document
/// @ai:effects pure
fn root_element(xml: &str, origin: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut root: Option<String> = None;
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if depth == 0 {
                    if root.is_some() {
                        return Err(malformed(origin, "multiple root elements"));
                    }
                    root = Some(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                }
                depth += 1;
            }
            Ok(Event::Empty(e)) => {
                if depth == 0 {
                    if root.is_some() {
                        return Err(malformed(origin, "multiple root elements"));
                    }
                    root = Some(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                }
            }
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Text(t)) if depth == 0 => {
                if !t.iter().all(u8::is_ascii_whitespace) {
                    return Err(malformed(origin, "text outside of the root element"));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(malformed(
                    origin,
                    &format!("at position {}: {}", reader.buffer_position(), e),
                ))
            }
        }
    }

    if depth != 0 {
        return Err(malformed(origin, "unexpected end of document"));
    }

    root.ok_or_else(|| malformed(origin, "no root element"))
}

fn deserialize<'de, T: Deserialize<'de>>(xml: &'de str, origin: &str) -> Result<T> {
    quick_xml::de::from_str(xml).map_err(|e| malformed(origin, &e.to_string()))
}

fn malformed(origin: &str, reason: &str) -> Error {
    Error::MalformedDocument {
        origin: origin.to_string(),
        reason: reason.to_string(),
    }
}

fn convert_suite(raw: RawSuite) -> TestSuite {
    TestSuite {
        name: raw.name,
        cases: raw.cases.into_iter().map(convert_case).collect(),
    }
}

fn convert_case(raw: RawCase) -> TestCase {
    TestCase {
        name: raw.name,
        classname: raw.classname,
        file: raw.file,
        line: raw.line.and_then(|l| l.trim().parse().ok()),
        failures: raw
            .failures
            .into_iter()
            .map(|f| convert_failure(f, FailureKind::Failure))
            .collect(),
        errors: raw
            .errors
            .into_iter()
            .map(|f| convert_failure(f, FailureKind::Error))
            .collect(),
    }
}

fn convert_failure(raw: RawFailure, kind: FailureKind) -> Failure {
    Failure {
        kind,
        body: raw.text,
        summary: raw.message,
        failure_type: raw.kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PYTEST_REPORT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<testsuites>
  <testsuite name="pytest" errors="1" failures="1" skipped="1" tests="4">
    <testcase classname="tests.test_x" name="test_ok" file="tests/test_x.py" line="3" time="0.001" />
    <testcase classname="tests.test_x" name="test_eq" file="tests/test_x.py" line="7" time="0.002">
      <failure message="assert 1 == 2">def test_eq():
&gt;       assert 1 == 2
E       AssertionError: assert 1 == 2

tests/test_x.py:10: AssertionError</failure>
    </testcase>
    <testcase classname="tests.test_x" name="test_fixture" file="tests/test_x.py" line="12">
      <error message="failed on setup with &quot;KeyError&quot;"><![CDATA[E   KeyError: 'db']]></error>
    </testcase>
    <testcase classname="tests.test_x" name="test_skip" file="tests/test_x.py" line="20">
      <skipped type="pytest.skip" message="not today" />
    </testcase>
  </testsuite>
</testsuites>"#;

    #[test]
    fn test_parse_testsuites_root() {
        let report = parse_report(PYTEST_REPORT).unwrap();

        assert_eq!(report.suites.len(), 1);
        let suite = &report.suites[0];
        assert_eq!(suite.name.as_deref(), Some("pytest"));
        assert_eq!(suite.cases.len(), 4);

        let ok = &suite.cases[0];
        assert!(ok.failures.is_empty() && ok.errors.is_empty());
        assert_eq!(ok.line, Some(3));

        let eq = &suite.cases[1];
        assert_eq!(eq.name, "test_eq");
        assert_eq!(eq.classname.as_deref(), Some("tests.test_x"));
        assert_eq!(eq.file.as_deref(), Some("tests/test_x.py"));
        assert_eq!(eq.failures.len(), 1);
        assert_eq!(eq.failures[0].summary.as_deref(), Some("assert 1 == 2"));
        let body = eq.failures[0].body.as_deref().unwrap();
        assert!(body.contains(">       assert 1 == 2"));
        assert!(body.contains("tests/test_x.py:10: AssertionError"));

        let fixture = &suite.cases[2];
        assert!(fixture.failures.is_empty());
        assert_eq!(fixture.errors.len(), 1);
        assert_eq!(fixture.errors[0].kind, FailureKind::Error);
        assert_eq!(fixture.errors[0].body.as_deref().map(str::trim), Some("E   KeyError: 'db'"));
        assert_eq!(
            fixture.errors[0].summary.as_deref(),
            Some(r#"failed on setup with "KeyError""#)
        );

        assert_eq!(report.failure_count(), 2);
    }

    #[test]
    fn test_parse_single_testsuite_root() {
        let xml = r#"<testsuite name="solo">
  <testcase name="test_a" line="not-a-number">
    <failure message="first" />
    <failure message="second" />
  </testcase>
</testsuite>"#;

        let report = parse_report(xml).unwrap();

        assert_eq!(report.suites.len(), 1);
        let case = &report.suites[0].cases[0];
        assert_eq!(case.line, None);
        assert_eq!(case.classname, None);
        let summaries: Vec<_> = case.failures.iter().map(|f| f.summary.as_deref()).collect();
        assert_eq!(summaries, vec![Some("first"), Some("second")]);
    }

    #[test]
    fn test_empty_testsuites_has_no_structure() {
        let report = parse_report("<testsuites></testsuites>").unwrap();
        assert!(report.is_empty());

        let report = parse_report("<testsuites/>").unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_unknown_root_has_no_structure() {
        let report = parse_report("<coverage><package name=\"x\"/></coverage>").unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_malformed_documents_are_rejected() {
        for xml in [
            "<testsuites><testsuite></testsuites>",
            "<testsuites>",
            "not xml at all",
            "",
        ] {
            let err = parse_report(xml).unwrap_err();
            assert!(
                matches!(err, Error::MalformedDocument { .. }),
                "expected malformed for {:?}, got {:?}",
                xml,
                err
            );
        }
    }

    #[test]
    fn test_load_report_names_file_in_errors() {
        let mut file = NamedTempFile::with_suffix(".xml").unwrap();
        writeln!(file, "<testsuites><oops></testsuites>").unwrap();

        let err = load_report(file.path()).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Invalid XML in "));
        assert!(message.contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_load_report_missing_file() {
        let err = load_report(Path::new("missing/report.xml")).unwrap_err();
        assert!(matches!(err, Error::InputNotFound(_)));
    }
}
