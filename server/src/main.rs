use std::error::Error;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue};
use axum::routing::get;
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use clap::{Parser, ValueEnum};
use doodleboard_shared::API_DRAWINGS_PATH;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod handlers;
mod ids;
mod logic;
mod state;
mod storage;

use crate::handlers::{create_drawing, get_drawing, list_drawings, ping_handler};
use crate::state::AppState;
use crate::storage::{
    FileStorage, MemoryStorage, S3Credentials, S3Storage, S3StorageConfig, Storage,
};

/// Data URLs of a full canvas stay well below this.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StorageKind {
    File,
    S3,
    Memory,
}

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    #[arg(long, env = "PORT", default_value_t = 4000)]
    port: u16,
    #[arg(long, env = "PUBLIC_DIR")]
    public_dir: Option<PathBuf>,
    #[arg(long, env = "STORAGE", value_enum, default_value_t = StorageKind::File)]
    storage: StorageKind,
    #[arg(long, env = "DATA_DIR")]
    data_dir: Option<PathBuf>,
    #[arg(long, env = "S3_BUCKET")]
    s3_bucket: Option<String>,
    #[arg(long, env = "S3_PREFIX")]
    s3_prefix: Option<String>,
    #[arg(long, env = "S3_REGION")]
    s3_region: Option<String>,
    #[arg(long, env = "S3_ENDPOINT_URL")]
    s3_endpoint_url: Option<String>,
    #[arg(long, env = "S3_FORCE_PATH_STYLE")]
    s3_force_path_style: bool,
    #[arg(long, env = "S3_ACCESS_KEY_ID", requires = "s3_secret_access_key")]
    s3_access_key_id: Option<String>,
    #[arg(
        long,
        env = "S3_SECRET_ACCESS_KEY",
        hide_env_values = true,
        requires = "s3_access_key_id"
    )]
    s3_secret_access_key: Option<String>,
    #[arg(long, env = "TLS_CERT", requires = "tls_key")]
    tls_cert: Option<PathBuf>,
    #[arg(long, env = "TLS_KEY", requires = "tls_cert")]
    tls_key: Option<PathBuf>,
}

fn default_dir(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join(name)
}

async fn build_storage(args: &Args) -> Result<Arc<dyn Storage>, Box<dyn Error>> {
    match args.storage {
        StorageKind::File => {
            let data_dir = args.data_dir.clone().unwrap_or_else(|| default_dir("data"));
            tokio::fs::create_dir_all(&data_dir).await?;
            tracing::info!(data_dir = %data_dir.display(), "using file storage");
            Ok(Arc::new(FileStorage::new(data_dir)))
        }
        StorageKind::S3 => {
            let bucket = args
                .s3_bucket
                .clone()
                .ok_or("--s3-bucket is required with --storage s3")?;
            tracing::info!(%bucket, "using s3 storage");
            let credentials = match (&args.s3_access_key_id, &args.s3_secret_access_key) {
                (Some(access_key_id), Some(secret_access_key)) => Some(S3Credentials {
                    access_key_id: access_key_id.clone(),
                    secret_access_key: secret_access_key.clone(),
                }),
                _ => None,
            };
            let config = S3StorageConfig {
                bucket,
                prefix: args.s3_prefix.clone(),
                region: args.s3_region.clone(),
                endpoint_url: args.s3_endpoint_url.clone(),
                force_path_style: args.s3_force_path_style,
                credentials,
            };
            Ok(Arc::new(S3Storage::new(config).await))
        }
        StorageKind::Memory => {
            tracing::warn!("using in-memory storage, drawings are lost on restart");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}

fn build_router(state: AppState, public_dir: PathBuf) -> Router {
    let api = Router::new()
        .route(API_DRAWINGS_PATH, get(list_drawings).post(create_drawing))
        .route(&format!("{API_DRAWINGS_PATH}/:id"), get(get_drawing))
        .route_layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    Router::new()
        .merge(api)
        .route("/ping", get(ping_handler))
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(true))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doodleboard_server=info,tower_http=info".into()),
        )
        .init();

    let args = Args::parse();
    let storage = build_storage(&args).await?;
    let public_dir = args.public_dir.clone().unwrap_or_else(|| default_dir("public"));
    let app = build_router(AppState::new(storage), public_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    match (args.tls_cert, args.tls_key) {
        (Some(cert), Some(key)) => {
            let tls = RustlsConfig::from_pem_file(cert, key).await?;
            tracing::info!("Doodleboard running at https://localhost:{}", args.port);
            axum_server::bind_rustls(addr, tls)
                .serve(app.into_make_service())
                .await?;
        }
        _ => {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            tracing::info!("Doodleboard running at http://localhost:{}", args.port);
            axum::serve(listener, app).await?;
        }
    }
    Ok(())
}
