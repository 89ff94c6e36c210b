use actix_web::{HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check() -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    // Check the booking-provider endpoint configuration (connectivity is
    // not probed here, a failing provider surfaces on the search routes).
    let provider_result = check_provider_config();
    health
        .services
        .insert("booking_provider".to_string(), provider_result.clone());

    if provider_result.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

fn check_provider_config() -> ServiceStatus {
    match env::var("PROVIDER_BASE_URL") {
        Ok(url) => ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("provider endpoint configured ({})", url)),
        },
        Err(_) => ServiceStatus {
            status: "ok".to_string(),
            details: Some("PROVIDER_BASE_URL not set, using default endpoint".to_string()),
        },
    }
}
