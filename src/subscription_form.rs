//! Form state for the newsletter sign-up box.
//!
//! The page shell owns a [`SubscriptionForm`], binds its input to
//! [`SubscriptionForm::email`], calls [`SubscriptionForm::submit`] on submit
//! and renders `field_errors` inline and `notification` as a toast.

use serde_json::json;

use crate::domain::new_subscriber::NewSubscriber;
use crate::domain::validation::FieldIssue;
use crate::subscription_client::SubscriptionClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationVariant {
    Success,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    fn subscribed() -> Self {
        Self {
            title: "Welcome aboard!".into(),
            description: "You've successfully subscribed to our newsletter.".into(),
            variant: NotificationVariant::Success,
        }
    }

    fn failed(description: String) -> Self {
        Self {
            title: "Subscription failed".into(),
            description,
            variant: NotificationVariant::Destructive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The draft failed the shared schema; nothing was sent.
    Blocked,
    Subscribed,
    Failed,
}

#[derive(Debug, Default)]
pub struct SubscriptionForm {
    pub email: String,
    pub field_errors: Vec<FieldIssue>,
    pub notification: Option<Notification>,
}

impl SubscriptionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    /// Validates the draft locally, then makes a single submission attempt.
    ///
    /// The draft is only cleared on success.
    #[tracing::instrument(name = "Submit the subscription form", skip(self, client))]
    pub async fn submit(&mut self, client: &SubscriptionClient) -> SubmitOutcome {
        let new_subscriber = match NewSubscriber::parse(&json!({ "email": self.email })) {
            Ok(new_subscriber) => new_subscriber,
            Err(err) => {
                self.field_errors = err.issues().to_vec();
                return SubmitOutcome::Blocked;
            }
        };
        self.field_errors.clear();

        match client.create_subscriber(&new_subscriber).await {
            Ok(_) => {
                self.email.clear();
                self.notification = Some(Notification::subscribed());
                SubmitOutcome::Subscribed
            }
            Err(err) => {
                self.notification = Some(Notification::failed(err.to_string()));
                SubmitOutcome::Failed
            }
        }
    }
}
