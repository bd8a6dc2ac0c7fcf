use std::fmt;

/// Why a single field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    ExpectedObject,
    Missing,
    InvalidType,
    InvalidFormat,
}

impl IssueKind {
    pub fn message(&self) -> &'static str {
        match self {
            IssueKind::ExpectedObject => "Expected an object",
            IssueKind::Missing => "Required",
            IssueKind::InvalidType => "Expected string",
            IssueKind::InvalidFormat => "Invalid email address",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub kind: IssueKind,
}

impl FieldIssue {
    pub fn new(field: &str, kind: IssueKind) -> Self {
        Self {
            field: field.to_string(),
            kind,
        }
    }

    pub fn message(&self) -> &'static str {
        self.kind.message()
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message())
    }
}

/// Every field that failed to parse. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", join_issues(.issues))]
pub struct ValidationError {
    issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn new(issue: FieldIssue) -> Self {
        Self {
            issues: vec![issue],
        }
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    pub fn first(&self) -> &FieldIssue {
        &self.issues[0]
    }

    pub fn has_issue(&self, field: &str, kind: IssueKind) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.field == field && issue.kind == kind)
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    let messages: Vec<String> = issues.iter().map(|issue| issue.to_string()).collect();

    messages.join("; ")
}

impl From<FieldIssue> for ValidationError {
    fn from(issue: FieldIssue) -> Self {
        ValidationError::new(issue)
    }
}
