//! @ai:module:intent Read-only model of a parsed test report
//! @ai:module:layer domain
//! @ai:module:public_api Report, TestSuite, TestCase, Failure, FailureKind
//! @ai:module:stateless true

use serde::Serialize;

/// @ai:intent Ordered collection of suites; empty means no suite structure was found
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Report {
    pub suites: Vec<TestSuite>,
}

/// @ai:intent Ordered collection of test cases
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct TestSuite {
    pub name: Option<String>,
    pub cases: Vec<TestCase>,
}

/// @ai:intent A single test case with its declared definition site
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct TestCase {
    pub name: String,
    pub classname: Option<String>,
    /// File the case is defined in.
    pub file: Option<String>,
    /// Definition line of the case, not the failure line.
    pub line: Option<usize>,
    pub failures: Vec<Failure>,
    pub errors: Vec<Failure>,
}

/// @ai:intent Distinguishes assertion failures from errors raised outside assertions
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    Failure,
    Error,
}

/// @ai:intent A non-passing outcome attached to a test case
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    /// Node body; usually the full traceback.
    pub body: Option<String>,
    /// Short `message` attribute.
    pub summary: Option<String>,
    pub failure_type: Option<String>,
}

impl Report {
    /// @ai:intent Check whether the document carried any suite structure
    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }

    /// @ai:intent Count failure and error entries across all suites
    /// @ai:effects pure
    pub fn failure_count(&self) -> usize {
        self.suites
            .iter()
            .flat_map(|suite| &suite.cases)
            .map(|case| case.failures.len() + case.errors.len())
            .sum()
    }
}

impl TestCase {
    /// @ai:intent Iterate failures then errors; both count as non-passing
    pub fn non_passing(&self) -> impl Iterator<Item = &Failure> {
        self.failures.iter().chain(self.errors.iter())
    }
}

impl Failure {
    /// @ai:intent Pick the diagnostic text: body first, then the summary attribute
    /// @ai:post returned text is trimmed and non-empty
    pub fn message(&self) -> Option<&str> {
        [self.body.as_deref(), self.summary.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|text| !text.is_empty())
    }
}
