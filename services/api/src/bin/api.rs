//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{PgStore, WebhookNotifier},
    config::Config,
    error::ApiError,
    web::{
        applications::{
            create_application_handler, list_applications_handler,
            update_application_status_handler,
        },
        health_handler,
        jobs::{get_job_handler, list_jobs_handler},
        leads::{
            create_lead_handler, delete_lead_handler, get_lead_handler, lead_stats_handler,
            list_leads_handler, update_lead_handler, update_lead_status_handler,
        },
        locale_redirect, require_admin, state::AppState, ApiDoc,
    },
};
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to the Store & Run Migrations ---
    let store = Arc::new(PgStore::connect(&config).await?);
    if config.store_configured() {
        info!("Running database migrations...");
        store.run_migrations().await?;
        info!("Database migrations complete.");
    } else {
        warn!("No store credentials set; intake endpoints will report 'database not configured'");
    }

    // --- 3. Initialize the Notifier ---
    let notifier = Arc::new(WebhookNotifier::new(config.webhook_url.clone()));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        leads: store.clone(),
        careers: store,
        notifier,
        config: config.clone(),
    });

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .cors_origin
                .parse::<HeaderValue>()
                .map_err(|e| ApiError::Internal(format!("Invalid CORS_ORIGIN: {}", e)))?,
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    // Public routes (no token required)
    let public_routes = Router::new()
        .route("/health", get(health_handler))
        .route("/api/leads", post(create_lead_handler))
        .route("/api/applications", post(create_application_handler))
        .route("/api/jobs", get(list_jobs_handler))
        .route("/api/jobs/{slug}", get(get_job_handler));

    // Admin routes (bearer token required)
    let admin_routes = Router::new()
        .route("/api/leads", get(list_leads_handler))
        .route("/api/leads/stats", get(lead_stats_handler))
        .route(
            "/api/leads/{id}",
            get(get_lead_handler)
                .patch(update_lead_handler)
                .delete(delete_lead_handler),
        )
        .route("/api/leads/{id}/status", post(update_lead_status_handler))
        .route("/api/applications", get(list_applications_handler))
        .route(
            "/api/applications/{id}/status",
            patch(update_application_status_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_admin,
        ));

    // Combine API routes
    let api_router = Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .layer(axum_middleware::from_fn(locale_redirect))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
