use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

use super::{StoreError, SubscriberStore};
use crate::domain::subscriber::Subscriber;
use crate::domain::subscriber_email::SubscriberEmail;

const UNIQUE_VIOLATION: &str = "23505";

/// Subscribers table in Postgres. Uniqueness comes from the `UNIQUE`
/// constraint on `subscribers.email`.
#[derive(Clone)]
pub struct PgSubscriberStore {
    db_pool: PgPool,
}

impl PgSubscriberStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriberStore for PgSubscriberStore {
    #[tracing::instrument(name = "Find a subscriber by email", skip(self))]
    async fn find_by_email(
        &self,
        email: &SubscriberEmail,
    ) -> Result<Option<Subscriber>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, created_at
            FROM subscribers
            WHERE email = $1
            "#,
        )
        .bind(email.as_ref())
        .fetch_optional(&self.db_pool)
        .await
        .map_err(|err| {
            tracing::error!("Failed to execute query: {:?}", err);
            StoreError::Unavailable(Box::new(err))
        })?;

        row.map(subscriber_from_row).transpose()
    }

    #[tracing::instrument(
        name = "Insert a new subscriber into the database",
        skip(self, subscriber),
        fields(subscriber_id = %subscriber.id)
    )]
    async fn insert(&self, subscriber: &Subscriber) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO subscribers (id, email, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(subscriber.id)
        .bind(subscriber.email.as_ref())
        .bind(subscriber.created_at)
        .execute(&self.db_pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                return StoreError::Duplicate;
            }
            tracing::error!("Failed to execute query: {:?}", err);
            StoreError::Unavailable(Box::new(err))
        })?;

        Ok(())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

fn subscriber_from_row(row: PgRow) -> Result<Subscriber, StoreError> {
    let email: String = row
        .try_get("email")
        .map_err(|err| StoreError::Unavailable(Box::new(err)))?;
    let email = SubscriberEmail::parse(email.clone()).map_err(|_| {
        StoreError::Unavailable(format!("Stored email {} is not valid", email).into())
    })?;

    Ok(Subscriber {
        id: row
            .try_get("id")
            .map_err(|err| StoreError::Unavailable(Box::new(err)))?,
        email,
        created_at: row
            .try_get("created_at")
            .map_err(|err| StoreError::Unavailable(Box::new(err)))?,
    })
}
