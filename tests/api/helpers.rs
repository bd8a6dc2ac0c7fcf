use once_cell::sync::Lazy;
use reqwest::Response;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use uuid::Uuid;

use newsletter_signup::{
    config::{get_configuration, DatabaseSettings, Settings},
    startup::{get_connection_db_pool, run_migrations, Application},
    telemetry::{get_subscriber, init_subscriber},
};

// Set TEST_LOG to see the logs of the application under test
static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        init_subscriber(get_subscriber("test".into(), "debug".into(), std::io::stdout));
    } else {
        init_subscriber(get_subscriber("test".into(), "debug".into(), std::io::sink));
    }
});

pub struct TestApp {
    pub config: Settings,
    pub address: String,
    pub db_pool: PgPool,
}

impl TestApp {
    pub async fn spawn_app() -> TestApp {
        Lazy::force(&TRACING);

        let mut config = get_configuration().expect("Missing configuration file.");
        let db_test_name = format!("db_{}", Uuid::new_v4().to_string().replace('-', "_"));

        // We are using port 0 as way to define a different port per each test. Port 0 is a special case that operating systems
        // take into account: when port is 0, the OS will search for the first available port
        config.set_app_port(0);

        let db_pool = configure_db(&mut config.database, db_test_name).await;

        TestApp::start(config, db_pool).await
    }

    /// Spawns the application against a database server that is not listening.
    pub async fn spawn_app_without_db() -> TestApp {
        Lazy::force(&TRACING);

        let mut config = get_configuration().expect("Missing configuration file.");
        config.set_app_port(0);
        // Nothing listens on port 1
        config.database.port = 1;
        config.database.timeout_milliseconds = 500;

        let db_pool = get_connection_db_pool(&config.database);

        TestApp::start(config, db_pool).await
    }

    async fn start(config: Settings, db_pool: PgPool) -> TestApp {
        let application = Application::build(config.clone())
            .await
            .expect("Failed to build application.");

        let address = format!("http://127.0.0.1:{}", application.get_port());

        tokio::spawn(application.run_until_stop());

        TestApp {
            address,
            config,
            db_pool,
        }
    }

    pub async fn post_subscriber(&self, body: &serde_json::Value) -> Response {
        reqwest::Client::new()
            .post(format!("{}/api/subscribers", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_raw_subscriber(&self, body: &'static str) -> Response {
        reqwest::Client::new()
            .post(format!("{}/api/subscribers", self.address))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn count_subscribers(&self, email: &str) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM subscribers WHERE email = $1")
            .bind(email)
            .fetch_one(&self.db_pool)
            .await
            .expect("Query to count subscribers failed.")
    }

    pub async fn count_all_subscribers(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM subscribers")
            .fetch_one(&self.db_pool)
            .await
            .expect("Query to count subscribers failed.")
    }
}

async fn configure_db(db_config: &mut DatabaseSettings, db_test_name: String) -> PgPool {
    // Create database
    let mut connection = PgConnection::connect_with(&db_config.get_server_options())
        .await
        .expect("Failed to connect to Postgres.");

    connection
        .execute(&*format!(r#"CREATE DATABASE "{}";"#, db_test_name))
        .await
        .expect("Failed to create database.");

    connection
        .close()
        .await
        .expect("Failed to close connection.");

    // Execute migrations
    db_config.set_name(db_test_name);

    let db_pool = get_connection_db_pool(db_config);

    run_migrations(&db_pool)
        .await
        .expect("Failed to run migrations.");

    db_pool
}
