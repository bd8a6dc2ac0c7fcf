use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::domain::new_subscriber::NewSubscriber;
use crate::domain::subscriber::Subscriber;
use crate::domain::validation::ValidationError;
use crate::store::{StoreError, SubscriberStore};

pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(2);

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{0}")]
    ValidationFailure(#[from] ValidationError),
    #[error("You are already subscribed to our newsletter.")]
    DuplicateSubscriber,
    #[error("Failed to reach the subscriber store.")]
    StorageFailure(#[source] StoreError),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("The subscriber store did not answer within {0:?}.")]
pub struct StoreTimeout(Duration);

/// The only writer of subscriber records.
#[derive(Clone)]
pub struct SubscriptionService {
    store: Arc<dyn SubscriberStore>,
    timeout: Duration,
}

impl SubscriptionService {
    pub fn new(store: Arc<dyn SubscriberStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Validates `input`, rejects emails that are already stored and
    /// persists a new [`Subscriber`].
    ///
    /// Writes at most once, and only on success. A lookup that misses a
    /// concurrent insert is caught by the store's own uniqueness check.
    ///
    /// Only the lookup is bounded here. Once the insert is dispatched its
    /// outcome is whatever the store reports, so a slow acknowledgement of a
    /// committed row is never turned into a failure. The Postgres store bounds
    /// it server side with `statement_timeout`.
    #[tracing::instrument(
        name = "Create a new subscriber",
        skip(self, input),
        fields(subscriber_email = tracing::field::Empty)
    )]
    pub async fn create_subscriber(&self, input: &Value) -> Result<Subscriber, SubscribeError> {
        let new_subscriber = NewSubscriber::parse(input).map_err(|err| {
            tracing::warn!("Validation error: {}", err);
            SubscribeError::ValidationFailure(err)
        })?;

        tracing::Span::current().record("subscriber_email", new_subscriber.email.as_ref());

        let existing = self
            .with_timeout(self.store.find_by_email(&new_subscriber.email))
            .await?;

        if existing.is_some() {
            tracing::info!("Email {} is already subscribed", new_subscriber.email);
            return Err(SubscribeError::DuplicateSubscriber);
        }

        let subscriber = Subscriber::create(new_subscriber);

        self.store
            .insert(&subscriber)
            .await
            .map_err(storage_failure)?;

        tracing::info!(subscriber_id = %subscriber.id, "New subscriber has been saved");

        Ok(subscriber)
    }

    async fn with_timeout<T>(
        &self,
        operation: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, SubscribeError> {
        match tokio::time::timeout(self.timeout, operation).await {
            Ok(result) => result.map_err(storage_failure),
            Err(_) => {
                tracing::error!("Subscriber store timed out after {:?}", self.timeout);
                Err(SubscribeError::StorageFailure(StoreError::Unavailable(
                    Box::new(StoreTimeout(self.timeout)),
                )))
            }
        }
    }
}

fn storage_failure(err: StoreError) -> SubscribeError {
    match err {
        StoreError::Duplicate => {
            tracing::info!("Insert rejected by the store's unique constraint");
            SubscribeError::DuplicateSubscriber
        }
        err => {
            tracing::error!("Subscriber store failed: {:?}", err);
            SubscribeError::StorageFailure(err)
        }
    }
}
