pub mod routes;
pub mod startup;
pub mod configuration;
pub mod telemetry;
pub mod utils;
pub mod schema;
pub mod models;
pub mod email_client;
pub mod notifications;
pub mod domain;
pub mod auth;
pub mod session_state;
pub mod admin_middleware;
pub mod menus;
pub mod db_interaction;
