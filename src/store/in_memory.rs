use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{StoreError, SubscriberStore};
use crate::domain::subscriber::Subscriber;
use crate::domain::subscriber_email::SubscriberEmail;

/// Process-local store keyed by email. Check and insert happen under one lock.
#[derive(Clone, Default)]
pub struct InMemorySubscriberStore {
    inner: Arc<Mutex<HashMap<SubscriberEmail, Subscriber>>>,
}

impl InMemorySubscriberStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

#[async_trait]
impl SubscriberStore for InMemorySubscriberStore {
    async fn find_by_email(
        &self,
        email: &SubscriberEmail,
    ) -> Result<Option<Subscriber>, StoreError> {
        Ok(self.inner.lock().await.get(email).cloned())
    }

    async fn insert(&self, subscriber: &Subscriber) -> Result<(), StoreError> {
        let mut subscribers = self.inner.lock().await;

        if subscribers.contains_key(&subscriber.email) {
            return Err(StoreError::Duplicate);
        }

        subscribers.insert(subscriber.email.clone(), subscriber.clone());

        Ok(())
    }
}
