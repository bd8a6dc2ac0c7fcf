use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use serde_json::{json, Value};

use crate::subscription_service::{SubscribeError, SubscriptionService};

pub const SUBSCRIBERS_PATH: &str = "/api/subscribers";

const STORAGE_FAILURE_MESSAGE: &str = "Something went wrong. Please try again later.";

#[tracing::instrument(name = "Creating a new subscriber handler", skip(body, service))]
pub async fn handle_create_subscriber(
    body: web::Json<Value>,
    service: web::Data<SubscriptionService>,
) -> Result<HttpResponse, SubscribeError> {
    let subscriber = service.create_subscriber(&body).await?;

    Ok(HttpResponse::Created().json(subscriber))
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::ValidationFailure(_) => StatusCode::BAD_REQUEST,
            SubscribeError::DuplicateSubscriber => StatusCode::CONFLICT,
            SubscribeError::StorageFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            SubscribeError::ValidationFailure(err) => {
                let issues: Vec<Value> = err
                    .issues()
                    .iter()
                    .map(|issue| json!({"field": issue.field, "message": issue.message()}))
                    .collect();

                json!({
                    "message": err.first().message(),
                    "field": err.first().field,
                    "issues": issues,
                })
            }
            SubscribeError::DuplicateSubscriber => json!({ "message": self.to_string() }),
            // Store errors stay in the logs.
            SubscribeError::StorageFailure(_) => json!({ "message": STORAGE_FAILURE_MESSAGE }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Bodies that are not JSON never reach the schema; answer them with the same shape.
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::warn!("Rejected request body: {}", err);
    let response = HttpResponse::BadRequest().json(json!({ "message": "Invalid request body" }));

    actix_web::error::InternalError::from_response(err, response).into()
}
