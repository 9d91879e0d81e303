// main.rs
use actix_cors::Cors;
use actix_files::Files;
use actix_web::http::header;
use actix_web::middleware::Logger;
use actix_web::web::{FormConfig, JsonConfig};
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;

mod auth;
mod controllers;
mod db;
mod models;
mod query;
mod report;
mod utils;

use controllers::captcha_controller::LoginAttempts;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("starting up...");
    let pool = match db::establish_connection().await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Gagal inisialisasi pool database: {:?}", e);
            std::process::exit(1);
        }
    };

    let attempts = web::Data::new(LoginAttempts::default());
    let cors_origin =
        std::env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string());

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&cors_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
            .supports_credentials()
            .max_age(3600);

        let json_config = JsonConfig::default()
            .limit(50 * 1024 * 1024) // 50MB untuk JSON
            .content_type_required(false) // Kadang header content-type tidak tepat
            .error_handler(|err, _req| {
                log::error!("JSON payload error: {}", err);
                actix_web::error::ErrorBadRequest(format!("Payload error: {}", err))
            });

        // Untuk Form data
        let form_config = FormConfig::default()
            .limit(50 * 1024 * 1024) // 50MB untuk form
            .error_handler(|err, _req| {
                log::error!("Form payload error: {}", err);
                actix_web::error::ErrorBadRequest(format!("Form error: {}", err))
            });

        // Untuk raw payload
        let payload_config = web::PayloadConfig::new(50 * 1024 * 1024).limit(50 * 1024 * 1024);

        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(attempts.clone())
            .app_data(json_config)
            .app_data(form_config)
            .app_data(payload_config)
            .wrap(cors)
            .wrap(Logger::default())
            .service(Files::new("/uploads", utils::upload_root()))
            //personel
            .service(controllers::personel_controller::personnel)
            //pendidikan
            .service(controllers::pendidikan_controller::pendidikan)
            //absensi
            .service(controllers::absensi_controller::absensi)
            //penanganan LP/LI
            .service(controllers::lp_li_controller::lp_li)
            //user
            .service(controllers::user_controller::user)
            //auth
            .service(controllers::auth_controller::login)
            .service(controllers::auth_controller::logout)
            .service(controllers::captcha_controller::validate_captcha)
            //laporan
            .service(controllers::laporan_controller::laporan)
            .service(controllers::laporan_controller::laporan_download)
    })
    .bind(bind_addr)?
    .run()
    .await
}
