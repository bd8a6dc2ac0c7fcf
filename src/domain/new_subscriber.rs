use serde_json::Value;

use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::validation::{FieldIssue, IssueKind, ValidationError};

/// Subscriber input that passed the shared schema.
///
/// Both the HTTP handler and [`SubscriptionForm`](crate::subscription_form::SubscriptionForm)
/// go through [`NewSubscriber::parse`], so they accept and reject the same inputs.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct NewSubscriber {
    pub email: SubscriberEmail,
}

impl NewSubscriber {
    pub fn parse(input: &Value) -> Result<NewSubscriber, ValidationError> {
        let fields = input
            .as_object()
            .ok_or_else(|| FieldIssue::new("body", IssueKind::ExpectedObject))?;

        let email = match fields.get("email") {
            None | Some(Value::Null) => {
                return Err(FieldIssue::new("email", IssueKind::Missing).into())
            }
            Some(Value::String(email)) => SubscriberEmail::parse(email.clone())?,
            Some(_) => return Err(FieldIssue::new("email", IssueKind::InvalidType).into()),
        };

        Ok(NewSubscriber { email })
    }
}

impl TryFrom<Value> for NewSubscriber {
    type Error = ValidationError;

    fn try_from(input: Value) -> Result<Self, Self::Error> {
        NewSubscriber::parse(&input)
    }
}
