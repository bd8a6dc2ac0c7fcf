use serde_json::{json, Value};

use crate::helpers::TestApp;

#[tokio::test]
async fn subscribe_returns_201_with_the_created_subscriber() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_subscriber(&json!({"email": "user@example.com"}))
        .await;

    assert_eq!(201, response.status().as_u16());

    let body: Value = response.json().await.expect("Body is not JSON.");
    assert_eq!(body["email"], "user@example.com");
    assert!(body["id"].as_str().is_some(), "Missing id in {}", body);
    assert!(body["createdAt"].as_str().is_some(), "Missing createdAt in {}", body);
}

#[tokio::test]
async fn subscribe_persists_the_new_subscriber() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_subscriber(&json!({"email": "test@test.com"}))
        .await;
    let body: Value = response.json().await.expect("Body is not JSON.");

    let (id, email): (uuid::Uuid, String) =
        sqlx::query_as("SELECT id, email FROM subscribers;")
            .fetch_one(&test_app.db_pool)
            .await
            .expect("Query to fetch subscribers failed.");

    assert_eq!(email, "test@test.com");
    assert_eq!(body["id"], id.to_string());
}

#[tokio::test]
async fn subscribe_twice_returns_409_and_keeps_a_single_record() {
    let test_app = TestApp::spawn_app().await;
    let body = json!({"email": "user@example.com"});

    let first = test_app.post_subscriber(&body).await;
    let second = test_app.post_subscriber(&body).await;

    assert_eq!(201, first.status().as_u16());
    assert_eq!(409, second.status().as_u16());

    let error: Value = second.json().await.expect("Body is not JSON.");
    assert_eq!(
        error["message"],
        "You are already subscribed to our newsletter."
    );
    assert_eq!(test_app.count_subscribers("user@example.com").await, 1);
}

#[tokio::test]
async fn subscribe_treats_emails_case_sensitively() {
    let test_app = TestApp::spawn_app().await;

    let lower = test_app
        .post_subscriber(&json!({"email": "user@example.com"}))
        .await;
    let mixed = test_app
        .post_subscriber(&json!({"email": "User@example.com"}))
        .await;

    assert_eq!(201, lower.status().as_u16());
    assert_eq!(201, mixed.status().as_u16());
}

#[tokio::test]
async fn subscribe_returns_400_identifying_the_invalid_email() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_subscriber(&json!({"email": "not-an-email"}))
        .await;

    assert_eq!(400, response.status().as_u16());

    let error: Value = response.json().await.expect("Body is not JSON.");
    assert_eq!(error["field"], "email");
    assert_eq!(error["message"], "Invalid email address");
    assert_eq!(test_app.count_all_subscribers().await, 0);
}

#[tokio::test]
async fn subscribe_returns_400_when_body_is_present_but_not_valid() {
    let test_app = TestApp::spawn_app().await;

    // This is a common practice and it is called table-driven tests. In this case, it simulates different kind of possible request bodies
    // where API should return 400.
    let test_cases = vec![
        (json!({}), "missing email parameter"),
        (json!({"email": ""}), "empty email"),
        (json!({"email": 7}), "email is not a string"),
        (json!({"email": "user@localhost"}), "email domain without a dot"),
        (json!({"email": "userexample.com"}), "email without @"),
        (json!({"email": " user@example.com"}), "email with whitespace"),
        (json!(["user@example.com"]), "body is not an object"),
    ];

    for (invalid_body, error_message) in test_cases {
        // Rejection is repeatable and never leaves a partial record behind
        for _ in 0..2 {
            let response = test_app.post_subscriber(&invalid_body).await;

            assert_eq!(
                400,
                response.status().as_u16(),
                "The API did not fail with 400 status when payload was {}",
                error_message
            );
        }
    }

    assert_eq!(test_app.count_all_subscribers().await, 0);
}

#[tokio::test]
async fn subscribe_returns_400_when_body_is_not_json() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.post_raw_subscriber("email=user@example.com").await;

    assert_eq!(400, response.status().as_u16());

    let error: Value = response.json().await.expect("Body is not JSON.");
    assert_eq!(error["message"], "Invalid request body");
}

#[tokio::test]
async fn concurrent_subscriptions_for_one_email_create_a_single_record() {
    let test_app = TestApp::spawn_app().await;
    let attempts = 10;

    let handles: Vec<_> = (0..attempts)
        .map(|_| {
            let address = test_app.address.clone();
            tokio::spawn(async move {
                reqwest::Client::new()
                    .post(format!("{}/api/subscribers", address))
                    .json(&json!({"email": "race@example.com"}))
                    .send()
                    .await
                    .expect("Failed to execute request.")
                    .status()
                    .as_u16()
            })
        })
        .collect();

    let mut statuses = Vec::new();
    for handle in handles {
        statuses.push(handle.await.expect("Request task panicked."));
    }

    assert_eq!(statuses.iter().filter(|status| **status == 201).count(), 1);
    assert_eq!(
        statuses.iter().filter(|status| **status == 409).count(),
        attempts - 1
    );
    assert_eq!(test_app.count_subscribers("race@example.com").await, 1);
}

#[tokio::test]
async fn subscribe_returns_500_without_leaking_details_when_the_store_is_down() {
    let test_app = TestApp::spawn_app_without_db().await;

    let response = test_app
        .post_subscriber(&json!({"email": "user@example.com"}))
        .await;

    assert_eq!(500, response.status().as_u16());

    let error: Value = response.json().await.expect("Body is not JSON.");
    assert_eq!(
        error["message"],
        "Something went wrong. Please try again later."
    );
}
