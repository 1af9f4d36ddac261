use anyhow::Result;
use clap::{Arg, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use jumpscare_segments::api;
use jumpscare_segments::catalog::{CatalogProvider, HttpCatalogProvider};
use jumpscare_segments::config::JsonStateRepository;
use jumpscare_segments::service::SegmentService;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("Jump-Scare Segment Service")
        .version("0.1.0")
        .about("Ingests jump-scare timestamps and serves playback timeline segments")
        .arg(
            Arg::new("server-url")
                .short('s')
                .long("server-url")
                .value_name("URL")
                .help("Base URL of the media server catalog")
                .default_value("http://localhost:8096"),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .help("Media server API token")
                .default_value(""),
        )
        .arg(
            Arg::new("state-file")
                .short('f')
                .long("state-file")
                .value_name("FILE")
                .help("Path of the persisted state file")
                .default_value("./jumpscare-state.json"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("HTTP API port")
                .default_value("8097"),
        )
        .arg(
            Arg::new("import")
                .short('i')
                .long("import")
                .value_name("FILE")
                .help("Import a delimited text file, print the summary and exit"),
        )
        .arg(
            Arg::new("stats")
                .long("stats")
                .help("Print store statistics and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Initialize logging
    let env_filter = if matches.get_flag("verbose") {
        "jumpscare_segments=debug,info"
    } else {
        "jumpscare_segments=info,warn"
    };
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let server_url = matches.get_one::<String>("server-url").cloned().unwrap_or_default();
    let api_key = matches.get_one::<String>("api-key").cloned().unwrap_or_default();
    let state_file = PathBuf::from(
        matches
            .get_one::<String>("state-file")
            .cloned()
            .unwrap_or_default(),
    );
    let port: u16 = matches
        .get_one::<String>("port")
        .map(|p| p.parse())
        .transpose()?
        .unwrap_or(8097);

    if api_key.is_empty() {
        warn!("No API key supplied; catalog lookups may be rejected by the media server");
    }

    info!("🚀 Jump-scare segment service starting...");
    info!("📚 Catalog: {}", server_url);
    info!("💾 State file: {}", state_file.display());

    let catalog: Arc<dyn CatalogProvider> =
        Arc::new(HttpCatalogProvider::new(&server_url, &api_key, 30));
    let repository = Arc::new(JsonStateRepository::new(state_file));
    let service = Arc::new(SegmentService::initialize(catalog, repository).await?);

    // One-shot import mode
    if let Some(import_path) = matches.get_one::<String>("import") {
        let text = tokio::fs::read_to_string(import_path).await?;
        match service.import_csv(&text).await {
            Ok(summary) => {
                info!("✅ {}", summary.message);
                info!(
                    "📊 Imported: {}, skipped: {}, rows: {}",
                    summary.imported_count, summary.skipped_count, summary.total_rows
                );
            }
            Err(e) => return Err(anyhow::anyhow!("import failed: {}", e)),
        }
        return Ok(());
    }

    // One-shot statistics mode
    if matches.get_flag("stats") {
        let stats = service.statistics().await;
        info!(
            "📊 {} records across {} items ({} major, {} minor)",
            stats.total_records, stats.distinct_items, stats.major_count, stats.minor_count
        );
        return Ok(());
    }

    api::start_http_server(service, port).await
}
