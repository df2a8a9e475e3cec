use std::env;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub auth_base_url: String,
    pub auth_service_key: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/campus_connect".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            auth_base_url: env::var("AUTH_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:9999".to_string()),
            auth_service_key: env::var("AUTH_SERVICE_KEY").unwrap_or_default(),
        }
    }
}
