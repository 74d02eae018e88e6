mod candidates;
mod config;
mod errors;
mod llm_client;
mod models;
mod resume;
mod routes;
mod search;
mod state;

use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::candidates::documents::S3DocumentStore;
use crate::candidates::store::PgCandidateStore;
use crate::config::Config;
use crate::llm_client::SummaryClient;
use crate::resume::ExtractionRules;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HireAI API v{}", env!("CARGO_PKG_VERSION"));

    // Compile extraction rules once; a bad pattern is a startup error
    let rules = Arc::new(ExtractionRules::new().context("Failed to compile extraction rules")?);

    // Initialize PostgreSQL
    let store = Arc::new(PgCandidateStore::connect(&config.database_url).await?);

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    let documents = Arc::new(S3DocumentStore::new(
        s3,
        config.s3_bucket.clone(),
        &config.s3_public_url,
    ));
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    // Initialize summary client
    let summary = SummaryClient::new(config.gemini_api_key.clone())?;
    if summary.is_configured() {
        info!("Summary client initialized (model: {})", llm_client::MODEL);
    } else {
        info!("GEMINI_API_KEY not set; summaries are unavailable");
    }

    let state = AppState {
        store,
        documents,
        summary,
        rules,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "hireai-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    // MinIO serves buckets by path, not subdomain
    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
