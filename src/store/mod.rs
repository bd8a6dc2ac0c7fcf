//! Persistence for subscriber records.
//!
//! The service depends on exactly two capabilities: looking a record up by
//! email and inserting a new one. `insert` must be atomic with respect to
//! the uniqueness of `email`: when two inserts race for the same address,
//! exactly one of them succeeds and the other reports [`StoreError::Duplicate`].

mod in_memory;
mod postgres;

pub use in_memory::InMemorySubscriberStore;
pub use postgres::PgSubscriberStore;

use async_trait::async_trait;

use crate::domain::subscriber::Subscriber;
use crate::domain::subscriber_email::SubscriberEmail;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("A subscriber with this email already exists.")]
    Duplicate,
    #[error("The subscriber store could not complete the operation.")]
    Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[async_trait]
pub trait SubscriberStore: Send + Sync {
    async fn find_by_email(
        &self,
        email: &SubscriberEmail,
    ) -> Result<Option<Subscriber>, StoreError>;

    /// Fails with [`StoreError::Duplicate`] if the email is already stored.
    async fn insert(&self, subscriber: &Subscriber) -> Result<(), StoreError>;
}
