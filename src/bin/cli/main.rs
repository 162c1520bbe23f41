use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use object_transfer::{
    app::{AppBuilder, AppConfig, StorageBackend},
    domain::models::IncludeAll,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "object-transfer-cli")]
#[command(about = "Filtered bulk download and archival of bucket objects", long_about = None)]
struct Cli {
    /// Source location (`bucket` or `bucket/prefix`)
    #[arg(long, env = "SOURCE_BUCKET")]
    source_bucket: String,

    /// Archive location (`bucket` or `bucket/prefix`)
    #[arg(long, env = "ARCHIVE_BUCKET")]
    archive_bucket: String,

    /// Local directory downloads land in
    #[arg(long, env = "DOWNLOAD_DIR", default_value = "downloads")]
    download_dir: PathBuf,

    /// Keys matching this pattern are excluded from downloads
    #[arg(long, env = "EXCLUDE_PATTERN")]
    exclude_pattern: Option<String>,

    /// Storage backend type (s3 or memory)
    #[arg(long, env = "STORAGE_BACKEND", default_value = "s3")]
    backend: String,

    /// S3 region
    #[arg(long, env = "S3_REGION", default_value = "us-east-1")]
    region: String,

    /// S3 access key
    #[arg(long, env = "S3_ACCESS_KEY")]
    access_key: Option<String>,

    /// S3 secret key
    #[arg(long, env = "S3_SECRET_KEY")]
    secret_key: Option<String>,

    /// S3 endpoint URL (for S3-compatible stores)
    #[arg(long, env = "S3_ENDPOINT")]
    endpoint: Option<String>,

    /// Emit the transfer report as JSON on stdout
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download objects from the source location, excluding keys that
    /// match the exclusion pattern
    Download,

    /// Move every object from the source location to the archive
    /// location
    Archive,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let backend = match cli.backend.as_str() {
        "memory" => StorageBackend::InMemory,
        "s3" => StorageBackend::S3 {
            region: cli.region.clone(),
            access_key: cli.access_key.clone(),
            secret_key: cli.secret_key.clone(),
            endpoint: cli.endpoint.clone(),
        },
        other => bail!("unknown storage backend: {}", other),
    };

    let services = AppBuilder::new(AppConfig {
        source_bucket: cli.source_bucket.clone(),
        archive_bucket: cli.archive_bucket.clone(),
        download_dir: cli.download_dir.clone(),
        exclude_pattern: cli.exclude_pattern.clone(),
        backend,
    })
    .build()?;

    let report = match cli.command {
        Commands::Download => {
            services
                .task
                .download_matching(
                    &services.source,
                    &services.download_dir,
                    services.download_filter.as_ref(),
                )
                .await?
        }
        Commands::Archive => {
            services
                .task
                .move_matching(&services.source, &services.archive, &IncludeAll)
                .await?
        }
    };

    info!(%report, "transfer complete");

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    // Any failed or partial outcome counts as an overall failure here
    Ok(if report.is_complete_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
