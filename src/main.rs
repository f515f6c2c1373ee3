mod context;
mod error;
mod handlers;
mod middlewares;
mod models;
mod response;

use actix_web::web::{delete, get, post, put, scope, Data};
use actix_web::HttpServer;
use middlewares::auth::TokenAuth;
use sqlx::postgres::PgPoolOptions;

#[actix_web::main]
async fn main() -> Result<(), std::io::Error> {
    dotenv::dotenv().ok();
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "actix_web=info");
    }
    env_logger::init();
    let database_url = dotenv::var("DATABASE_URL").expect("environment variable DATABASE_URL not been set");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("failed to connect to database");
    HttpServer::new(move || {
        actix_web::App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(Data::new(pool.clone()))
            .service(
                scope("applicants")
                    .wrap(TokenAuth::admin(pool.clone()))
                    .route("create", post().to(handlers::applicant::create))
                    .route("update/{id}", put().to(handlers::applicant::update))
                    .route("delete/{id}", delete().to(handlers::applicant::delete_applicant))
                    .route("all", get().to(handlers::applicant::list))
                    .route("requests/history", get().to(handlers::request::history))
                    .route("requests/{id}", put().to(handlers::request::update_status))
                    .route("user/{id}", get().to(handlers::request::list_by_user))
                    .route("", get().to(handlers::request::list))
                    .route("{id}", get().to(handlers::applicant::detail)),
            )
    })
    .bind(("0.0.0.0", 8000))?
    .run()
    .await
}
