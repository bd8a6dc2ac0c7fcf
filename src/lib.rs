pub mod config;
pub mod domain;
pub mod routes;
pub mod startup;
pub mod store;
pub mod subscription_client;
pub mod subscription_form;
pub mod subscription_service;
pub mod telemetry;
