use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, middleware, web};

use rollbook::config::AppConfig;
use rollbook::{auth, db, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env();

    let pool = db::init_pool(&config)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    db::run_migrations(&pool)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    // Seed the admin account if the table is empty
    let admin_hash = auth::password::hash_password(&config.admin_password)
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    db::seed_admin(&pool, &admin_hash)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let secret_key = config.session_key();
    let bind_addr = config.bind_addr.clone();
    let config = web::Data::new(config);

    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            secret_key.clone(),
        )
        .cookie_secure(false)
        .cookie_http_only(true)
        .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(config.clone())
            .configure(handlers::configure)
            // Default 404 handler (must be registered last)
            .default_service(web::to(|| async {
                let html = include_str!("../templates/errors/404.html");
                actix_web::HttpResponse::NotFound()
                    .content_type("text/html; charset=utf-8")
                    .body(html)
            }))
    })
    .bind(bind_addr)?
    .run()
    .await
}
