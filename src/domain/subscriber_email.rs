use validator::validate_email;

use crate::domain::validation::{FieldIssue, IssueKind};

/// A syntactically valid email address, kept exactly as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(email: String) -> Result<SubscriberEmail, FieldIssue> {
        let has_whitespace = email.chars().any(char::is_whitespace);

        if has_whitespace || !has_dotted_domain(&email) || !validate_email(&email) {
            return Err(FieldIssue::new("email", IssueKind::InvalidFormat));
        }

        Ok(Self(email))
    }
}

// validate_email accepts single label hosts such as "user@localhost".
fn has_dotted_domain(email: &str) -> bool {
    match email.rsplit_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SubscriberEmail {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SubscriberEmail::parse(value.clone()).map_err(|_| format!("{} email is not valid", value))
    }
}

impl From<SubscriberEmail> for String {
    fn from(email: SubscriberEmail) -> Self {
        email.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
