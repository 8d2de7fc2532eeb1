mod context;
mod error;
mod handlers;
pub mod models;
pub mod response;
mod storer;
pub mod views;

use actix_web::web::{get, post, resource, scope, Data};
use actix_web::HttpServer;
use sqlx::postgres::PgPoolOptions;
use storer::LocalStorer;

#[actix_web::main]
async fn main() -> Result<(), std::io::Error> {
    dotenv::dotenv().ok();
    std::env::set_var("RUST_LOG", "actix_web=info");
    env_logger::init();
    let database_url = dotenv::var("DATABASE_URL").expect("environment variable DATABASE_URL not been set");
    let upload_path = dotenv::var("UPLOAD_PATH").expect("environment variable UPLOAD_PATH not been set");
    let media_base = dotenv::var("MEDIA_BASE_URL").expect("environment variable MEDIA_BASE_URL not been set");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("failed to connect to database");
    sqlx::migrate!("./migrations").run(&pool).await.expect("failed to run migrations");
    HttpServer::new(move || {
        actix_web::App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(LocalStorer::new(&upload_path, &media_base)))
            .service(
                scope("quiz")
                    .route("", get().to(handlers::quiz::list))
                    .route("", post().to(handlers::quiz::create))
                    .route("{quiz_id}", get().to(handlers::quiz::detail))
                    .route("{quiz_id}/stats", get().to(handlers::stats::detail)),
            )
            .service(resource("answer/{answer_id}").route(post().to(handlers::answer::submit)))
            .service(
                scope("article")
                    .route("", get().to(handlers::article::list))
                    .route("", post().to(handlers::article::create))
                    .route("{article_id}", get().to(handlers::article::detail)),
            )
            .service(
                scope("gallery")
                    .route("", get().to(handlers::gallery::list))
                    .route("", post().to(handlers::gallery::create)),
            )
            .service(resource("upload").route(post().to(handlers::upload::create::<LocalStorer>)))
            .service(actix_files::Files::new("/media", &upload_path))
    })
    .bind(("0.0.0.0", 8000))?
    .run()
    .await
}
