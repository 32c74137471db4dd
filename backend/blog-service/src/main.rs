use actix_cors::Cors;
use actix_web::{middleware::Logger, middleware::NormalizePath, web, App, HttpResponse, HttpServer};
use blog_service::cache::FeedCache;
use blog_service::handlers;
use blog_service::middleware::{BearerAuth, MetricsMiddleware};
use blog_service::openapi::ApiDoc;
use blog_service::Config;
use chrono::Utc;
use redis::aio::ConnectionManager;
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::collections::HashMap;
use std::io;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

struct HealthState {
    db_pool: PgPool,
    cache: FeedCache,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "lowercase")]
enum ComponentStatus {
    Healthy,
    Unhealthy,
}

#[derive(Serialize)]
struct ComponentCheck {
    status: ComponentStatus,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
}

#[derive(Serialize)]
struct ReadinessResponse {
    ready: bool,
    status: ComponentStatus,
    checks: HashMap<String, ComponentCheck>,
    timestamp: String,
}

impl HealthState {
    async fn check_postgres(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.db_pool)
            .await
            .map(|_| ())
    }

    async fn check_redis(&self) -> Result<(), blog_service::AppError> {
        self.cache.ping().await
    }
}

async fn health_summary(state: web::Data<HealthState>) -> HttpResponse {
    match state.check_postgres().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "blog-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "blog-service"
        })),
    }
}

async fn readiness_summary(state: web::Data<HealthState>) -> HttpResponse {
    let mut checks = HashMap::new();
    let mut ready = true;

    let start = Instant::now();
    let pg_result = state.check_postgres().await;
    let pg_latency = Some(start.elapsed().as_millis() as u64);
    let postgres_check = match pg_result {
        Ok(_) => ComponentCheck {
            status: ComponentStatus::Healthy,
            message: "PostgreSQL connection successful".to_string(),
            latency_ms: pg_latency,
        },
        Err(e) => {
            ready = false;
            ComponentCheck {
                status: ComponentStatus::Unhealthy,
                message: format!("PostgreSQL connection failed: {}", e),
                latency_ms: pg_latency,
            }
        }
    };
    checks.insert("postgresql".to_string(), postgres_check);

    let start = Instant::now();
    let redis_result = state.check_redis().await;
    let redis_latency = Some(start.elapsed().as_millis() as u64);
    let redis_check = match redis_result {
        Ok(_) => ComponentCheck {
            status: ComponentStatus::Healthy,
            message: "Redis ping successful".to_string(),
            latency_ms: redis_latency,
        },
        Err(e) => {
            ready = false;
            ComponentCheck {
                status: ComponentStatus::Unhealthy,
                message: format!("Redis ping failed: {}", e),
                latency_ms: redis_latency,
            }
        }
    };
    checks.insert("redis".to_string(), redis_check);

    let status = if ready {
        ComponentStatus::Healthy
    } else {
        ComponentStatus::Unhealthy
    };

    let response = ReadinessResponse {
        ready,
        status,
        checks,
        timestamp: Utc::now().to_rfc3339(),
    };

    if ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into()),
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

    tracing::info!("Starting blog-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Initialize database connection pool and run migrations
    let db_pool = match PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("migration failed: {e}")))?;

    tracing::info!("Connected to database, migrations applied");

    // Initialize the Redis-backed global feed cache
    let redis_client = redis::Client::open(config.cache.url.clone()).map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to create Redis client: {e}"),
        )
    })?;
    let redis_manager = ConnectionManager::new(redis_client).await.map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to initialize Redis connection: {e}"),
        )
    })?;
    let feed_cache = FeedCache::new(redis_manager, config.feed.global_ttl_secs);

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let health_state = web::Data::new(HealthState {
        db_pool: db_pool.clone(),
        cache: feed_cache.clone(),
    });
    let config_data = web::Data::new(config.clone());
    let pool_data = web::Data::new(db_pool.clone());
    let cache_data = web::Data::new(feed_cache.clone());

    let server_config = config.clone();
    HttpServer::new(move || {
        // Build CORS configuration
        let mut cors = Cors::default();
        for origin in server_config.cors.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        let openapi_doc = ApiDoc::openapi();

        App::new()
            .app_data(pool_data.clone())
            .app_data(cache_data.clone())
            .app_data(config_data.clone())
            .app_data(health_state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .wrap(MetricsMiddleware)
            .wrap(BearerAuth::new(&server_config.auth.jwt_secret))
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api/openapi.json", openapi_doc.clone()),
            )
            .route("/metrics", web::get().to(blog_service::metrics::serve_metrics))
            // Health check endpoints
            .route("/api/health", web::get().to(health_summary))
            .route("/api/health/ready", web::get().to(readiness_summary))
            .route("/api/health/live", web::get().to(liveness_check))
            // Fixed-path routes must precede the {username} catch-alls.
            .route("/", web::get().to(handlers::index))
            .route("/group/{slug}", web::get().to(handlers::group_posts))
            .service(
                web::resource("/new")
                    .route(web::get().to(handlers::new_post_form))
                    .route(web::post().to(handlers::create_post)),
            )
            .route("/follow", web::get().to(handlers::follow_index))
            .route("/{username}/follow", web::get().to(handlers::profile_follow))
            .route(
                "/{username}/unfollow",
                web::get().to(handlers::profile_unfollow),
            )
            .service(
                web::resource("/{username}/{post_id}/edit")
                    .route(web::get().to(handlers::post_edit_form))
                    .route(web::post().to(handlers::post_edit)),
            )
            .route(
                "/{username}/{post_id}/comment",
                web::post().to(handlers::add_comment),
            )
            .route("/{username}/{post_id}", web::get().to(handlers::post_view))
            .route("/{username}", web::get().to(handlers::profile))
    })
    .bind(&bind_address)?
    .workers(4)
    .run()
    .await?;

    tracing::info!("blog-service shutting down");

    Ok(())
}
