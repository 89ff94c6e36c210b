use std::{env, sync::Arc};

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use tripdesk_hotels_api::config::ProviderConfig;
use tripdesk_hotels_api::routes;
use tripdesk_hotels_api::routes::hotels::AppState;
use tripdesk_hotels_api::services::provider_client::HotelProviderClient;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    let host = env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);

    let provider_config = ProviderConfig::from_env();
    log::info!("booking provider endpoint: {}", provider_config.base_url);
    let provider = Arc::new(HotelProviderClient::new(provider_config));

    let state = web::Data::new(AppState::new(provider));
    log::info!("binding to {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(state.clone())
            .route("/health", web::get().to(routes::health::health_check))
            .configure(routes::hotels::configure::<HotelProviderClient>)
    })
    .bind((host, port))?
    .run()
    .await
}
