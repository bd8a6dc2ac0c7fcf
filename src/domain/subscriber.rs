use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::new_subscriber::NewSubscriber;
use crate::domain::subscriber_email::SubscriberEmail;

/// A persisted newsletter sign-up. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: Uuid,
    pub email: SubscriberEmail,
    pub created_at: DateTime<Utc>,
}

impl Subscriber {
    pub fn create(new_subscriber: NewSubscriber) -> Subscriber {
        Subscriber {
            id: Uuid::new_v4(),
            email: new_subscriber.email,
            created_at: Utc::now(),
        }
    }
}
