//! Serve command - run the HTTP service.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tracing::{info, warn};

use idscan_core::extract::DocumentParser;
use idscan_core::models::config::{IdScanConfig, StorageBackend};
use idscan_core::ocr::StaticTextProvider;
use idscan_core::service::DocumentService;
use idscan_core::store::{JsonFileStore, MemoryStore, RecordStore};

use super::load_config;
use crate::server::{self, AnyOcr, AppState};
use crate::vision::VisionProvider;

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Bind address (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Keep records in memory only
    #[arg(long)]
    memory: bool,

    /// Record store file (overrides config)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Skip the OCR provider and treat every upload as having this text
    #[arg(long, value_name = "FILE")]
    offline_text: Option<PathBuf>,
}

pub async fn run(args: ServeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    apply_overrides(&mut config, &args);

    let store = open_store(&config)?;
    let ocr = select_provider(&config, &args)?;
    let parser = DocumentParser::from_config(&config.extraction)?;

    let service = DocumentService::new(Arc::new(store), ocr).with_parser(parser);
    let state = Arc::new(AppState::new(service));

    let host: IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::new(host, config.server.port);

    let app = server::router(state, config.server.max_upload_bytes);
    server::serve(app, addr).await
}

fn apply_overrides(config: &mut IdScanConfig, args: &ServeArgs) {
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(path) = &args.store {
        config.storage.backend = StorageBackend::Json;
        config.storage.path = path.clone();
    }
    if args.memory {
        config.storage.backend = StorageBackend::Memory;
    }
}

fn open_store(config: &IdScanConfig) -> anyhow::Result<Box<dyn RecordStore>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory record store");
            Ok(Box::new(MemoryStore::new()))
        }
        StorageBackend::Json => {
            info!("Using record store {}", config.storage.path.display());
            Ok(Box::new(JsonFileStore::open(&config.storage.path)?))
        }
    }
}

fn select_provider(config: &IdScanConfig, args: &ServeArgs) -> anyhow::Result<AnyOcr> {
    if let Some(path) = &args.offline_text {
        warn!("OCR disabled, every upload reads as {}", path.display());
        let text = std::fs::read_to_string(path)?;
        return Ok(AnyOcr::Static(StaticTextProvider::new(text)));
    }

    Ok(AnyOcr::Vision(VisionProvider::from_config(&config.ocr)?))
}
