use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use notes_service::{handlers, middleware, Config};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn health_summary(pool: web::Data<sqlx::PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").fetch_one(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "notes-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "notes-service"
        })),
    }
}

async fn readiness_check(pool: web::Data<sqlx::PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").fetch_one(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({ "ready": true })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "ready": false,
            "error": format!("PostgreSQL connection failed: {}", e)
        })),
    }
}

async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "alive": true }))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        service = %config.service_name,
        environment = %config.environment,
        "Starting notes-service v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Initialize database connection pool
    let db_pool = match notes_service::db::create_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {:#}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|e| {
            tracing::error!("Migration failed: {}", e);
            io::Error::new(io::ErrorKind::Other, e)
        })?;
    tracing::info!("Migrations completed");

    let bind_address = format!("{}:{}", config.host, config.http_port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let server_config = config.clone();

    HttpServer::new(move || {
        // Build CORS configuration
        let mut cors = Cors::default();
        for origin in server_config.cors_allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(web::Data::new(server_config.clone()))
            .app_data(web::Data::new(db_pool.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            // Health check endpoints
            .route("/api/v1/health", web::get().to(health_summary))
            .route("/api/v1/health/ready", web::get().to(readiness_check))
            .route("/api/v1/health/live", web::get().to(liveness_check))
            .service(
                web::scope("/api/v1")
                    .wrap(middleware::AuthMiddleware)
                    .route("/stats", web::get().to(handlers::get_platform_stats))
                    .service(
                        web::scope("/users")
                            .service(
                                web::resource("")
                                    .route(web::post().to(handlers::register_profile)),
                            )
                            .service(
                                web::resource("/me")
                                    .route(web::get().to(handlers::get_my_profile))
                                    .route(web::patch().to(handlers::update_my_profile)),
                            )
                            .service(
                                web::resource("/{user_id}")
                                    .route(web::get().to(handlers::get_user_profile)),
                            ),
                    )
                    .service(
                        web::scope("/notes")
                            .route("/recent", web::get().to(handlers::get_recent_notes))
                            .route("/top", web::get().to(handlers::get_top_notes))
                            .route("/search", web::get().to(handlers::search_notes))
                            .route(
                                "/department/{department}",
                                web::get().to(handlers::get_department_notes),
                            )
                            .route(
                                "/user/{user_id}",
                                web::get().to(handlers::get_user_notes),
                            )
                            .service(
                                web::resource("")
                                    .route(web::post().to(handlers::create_note)),
                            )
                            .service(
                                web::resource("/{note_id}")
                                    .route(web::get().to(handlers::get_note))
                                    .route(web::delete().to(handlers::delete_own_note)),
                            )
                            .service(
                                web::resource("/{note_id}/vote")
                                    .route(web::get().to(handlers::get_my_vote))
                                    .route(web::post().to(handlers::vote_note)),
                            )
                            .service(
                                web::resource("/{note_id}/bookmark")
                                    .route(web::get().to(handlers::get_bookmark_status))
                                    .route(web::post().to(handlers::toggle_bookmark)),
                            )
                            .route(
                                "/{note_id}/download",
                                web::post().to(handlers::download_note),
                            )
                            .route(
                                "/{note_id}/report",
                                web::post().to(handlers::submit_report),
                            ),
                    )
                    .route("/bookmarks", web::get().to(handlers::my_bookmarks))
                    .route("/downloads", web::get().to(handlers::my_downloads))
                    .service(
                        web::scope("/admin")
                            .route("/reports", web::get().to(handlers::list_reports))
                            .route(
                                "/reports/{report_id}/resolve",
                                web::post().to(handlers::resolve_report),
                            )
                            .route("/notes", web::get().to(handlers::list_notes_by_status))
                            .route(
                                "/notes/{note_id}/restore",
                                web::post().to(handlers::restore_note_admin),
                            )
                            .route(
                                "/notes/{note_id}",
                                web::delete().to(handlers::delete_note_admin),
                            )
                            .route("/logs", web::get().to(handlers::get_admin_logs))
                            .route("/admins", web::get().to(handlers::list_admins))
                            .route(
                                "/users/search",
                                web::get().to(handlers::search_user_by_email),
                            )
                            .route(
                                "/users/{user_id}/promote",
                                web::post().to(handlers::promote_user),
                            )
                            .route(
                                "/users/{user_id}/demote",
                                web::post().to(handlers::demote_user),
                            ),
                    ),
            )
    })
    .bind(&bind_address)?
    .run()
    .await?;

    tracing::info!("notes-service shutting down");

    Ok(())
}
