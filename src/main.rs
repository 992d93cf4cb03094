use actix_web::{web, App, HttpResponse, HttpServer};
use dotenv::dotenv;
use log::info;
use sqlx::mysql::MySqlPoolOptions;

mod auth;
mod config;
mod models;
mod routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = config::AppConfig::from_env();
    let pool = MySqlPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("Failed to create pool");

    let bind_addr = config.bind_addr.clone();
    info!("Server running at http://{}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config.clone()))
            .route(
                "/",
                web::get().to(|| async { HttpResponse::Ok().body("Taskboard API") }),
            )
            .configure(routes::routes::auth_configure)
            .configure(routes::routes::tasks_configure)
            .configure(routes::routes::areas_configure)
            .configure(routes::routes::users_configure)
            .configure(routes::routes::roles_configure)
            .configure(routes::routes::assignments_configure)
            .configure(routes::routes::reports_configure)
    })
    .bind(bind_addr.as_str())?
    .run()
    .await
}
