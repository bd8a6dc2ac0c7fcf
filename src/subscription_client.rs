use reqwest::{Client, StatusCode};
use std::time;

use crate::domain::new_subscriber::NewSubscriber;
use crate::domain::subscriber::Subscriber;
use crate::routes::SUBSCRIBERS_PATH;

const REQUEST_TIMEOUT: time::Duration = time::Duration::from_secs(10);

pub const ALREADY_SUBSCRIBED_MESSAGE: &str = "You are already subscribed to our newsletter.";
pub const INVALID_INPUT_MESSAGE: &str = "Invalid email address";
pub const RETRY_LATER_MESSAGE: &str = "Failed to subscribe. Please try again later.";

/// Outcome categories shown to the user. Each one has exactly one message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("{}", ALREADY_SUBSCRIBED_MESSAGE)]
    AlreadySubscribed,
    /// Carries the server's message when the 400 body had one.
    #[error("{}", invalid_input_message(.0))]
    InvalidInput(Option<String>),
    #[error("{}", RETRY_LATER_MESSAGE)]
    Unavailable,
}

fn invalid_input_message(message: &Option<String>) -> &str {
    message.as_deref().unwrap_or(INVALID_INPUT_MESSAGE)
}

impl SubmissionError {
    pub fn from_status(status: StatusCode, body: &[u8]) -> SubmissionError {
        match status {
            StatusCode::CONFLICT => SubmissionError::AlreadySubscribed,
            StatusCode::BAD_REQUEST => SubmissionError::InvalidInput(message_from_body(body)),
            _ => SubmissionError::Unavailable,
        }
    }
}

fn message_from_body(body: &[u8]) -> Option<String> {
    let body: serde_json::Value = serde_json::from_slice(body).ok()?;

    body.get("message")?.as_str().map(String::from)
}

/// Sends already validated subscriber input to the create endpoint. Never retries.
pub struct SubscriptionClient {
    http_client: Client,
    base_url: String,
}

impl SubscriptionClient {
    pub fn new(
        base_url: String,
        timeout: Option<time::Duration>,
    ) -> Result<SubscriptionClient, reqwest::Error> {
        let http_client = Client::builder()
            .timeout(timeout.unwrap_or(REQUEST_TIMEOUT))
            .build()?;

        Ok(SubscriptionClient {
            http_client,
            base_url,
        })
    }

    #[tracing::instrument(
        name = "Submit a new subscriber",
        skip(self, new_subscriber),
        fields(subscriber_email = %new_subscriber.email)
    )]
    pub async fn create_subscriber(
        &self,
        new_subscriber: &NewSubscriber,
    ) -> Result<Subscriber, SubmissionError> {
        let url = format!("{}{}", self.base_url, SUBSCRIBERS_PATH);

        let response = self
            .http_client
            .post(&url)
            .json(new_subscriber)
            .send()
            .await
            .map_err(|err| {
                tracing::error!("Failed to reach the subscription endpoint: {:?}", err);
                SubmissionError::Unavailable
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|err| {
            tracing::error!("Failed to read the subscription response: {:?}", err);
            SubmissionError::Unavailable
        })?;

        if status != StatusCode::CREATED {
            tracing::warn!("Subscription endpoint answered {}", status);
            return Err(SubmissionError::from_status(status, &body));
        }

        serde_json::from_slice(&body).map_err(|err| {
            tracing::error!("Unexpected subscription response body: {:?}", err);
            SubmissionError::Unavailable
        })
    }
}
