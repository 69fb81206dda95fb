//! CLI entry point for the bus gateway.
//!
//! Serves the simplified REST API for the map client, and offers one-shot
//! commands for checking upstream credentials and running single queries.

use anyhow::{Context, Result};
use bus_gateway::{
    api::create_app,
    config::GatewayConfig,
    fetch::BasicClient,
    infra::montevideo::TokenManager,
    model::StopQuery,
    output::print_json,
    services::GatewayService,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bus_gateway")]
#[command(about = "REST gateway for Montevideo bus positions, lines and stops", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value_t = 5000)]
        port: u16,
    },
    /// Request an access token once and report the result
    CheckAuth,
    /// Run a single query and print the JSON result
    Fetch {
        #[arg(value_enum)]
        resource: FetchResource,

        /// Only buses of this line
        #[arg(long)]
        line: Option<String>,

        /// Latitude of the stop search center
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude of the stop search center
        #[arg(long, allow_hyphen_values = true)]
        lng: Option<f64>,

        /// Stop search radius in meters
        #[arg(long)]
        radius: Option<u32>,

        /// Indent the JSON output
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FetchResource {
    Buses,
    Lines,
    Stops,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bus_gateway.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bus_gateway.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = GatewayConfig::from_env()?;

    match cli.command {
        Commands::Serve { host, port } => {
            let gateway = GatewayService::from_config(&config)?;
            let app = create_app(gateway);

            let bind_addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&bind_addr)
                .await
                .with_context(|| format!("Failed to bind to {bind_addr}"))?;

            info!(addr = %bind_addr, "Starting server");
            axum::serve(listener, app).await.context("Server error")?;
        }
        Commands::CheckAuth => {
            check_auth(&config).await?;
        }
        Commands::Fetch {
            resource,
            line,
            lat,
            lng,
            radius,
            pretty,
        } => {
            let gateway = GatewayService::from_config(&config)?;
            match resource {
                FetchResource::Buses => print_json(&gateway.buses(line.as_deref()).await?, pretty)?,
                FetchResource::Lines => print_json(&gateway.lines().await?, pretty)?,
                FetchResource::Stops => {
                    let query = StopQuery::new(lat, lng, radius);
                    print_json(&gateway.stops(query).await?, pretty)?
                }
            }
        }
    }

    Ok(())
}

/// Runs one client-credentials grant against the configured auth endpoint.
#[tracing::instrument(skip(config))]
async fn check_auth(config: &GatewayConfig) -> Result<()> {
    let credentials = config
        .credentials
        .clone()
        .context("MONTEVIDEO_CLIENT_ID and MONTEVIDEO_CLIENT_SECRET must be set")?;
    let client = BasicClient::new(config.request_timeout, config.connect_timeout)?;
    let tokens = TokenManager::new(
        client,
        config
            .auth_url
            .parse::<reqwest::Url>()
            .context("invalid auth URL")?,
        credentials.clone(),
    );

    let token = tokens.refresh().await?;
    info!(
        client_id = %credentials.redacted_id(),
        expires_at = %token.expires_at,
        "API connection OK"
    );
    Ok(())
}
