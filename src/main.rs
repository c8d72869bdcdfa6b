use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use gallery_loader::application::services::MetricsCollector;
use gallery_loader::application::{ImageLoader, LoadGalleryUseCase};
use gallery_loader::domain::ImageRequest;
use gallery_loader::domain::services::FormatResolver;
use gallery_loader::infrastructure::{
    AppConfig, CliArgs, HttpImageFetcher, LoadedConfig, MemoryImageCache, StorageManager,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        let stderr_layer = fmt::layer().with_writer(std::io::stderr);
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<Option<LoadedConfig>> {
    let loaded = if let Some(path) = &args.config {
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Some(StorageManager::with_dir(dir).load_config(Some(path))?)
    } else if let Ok(storage) = StorageManager::new() {
        Some(storage.load_config(None)?)
    } else {
        None
    };
    Ok(loaded)
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let loaded = load_config(&args)?;
    let mut config = loaded
        .as_ref()
        .map(|loaded| loaded.config.clone())
        .unwrap_or_default();
    config.merge_with_args(&args);

    init_logging(&config)?;
    if let Some(loaded) = &loaded {
        loaded.report();
    }

    info!(version = gallery_loader::VERSION, "Starting gallery-loader");

    if args.resolve_only {
        let resolver = FormatResolver::default();
        for path in &args.paths {
            println!("{}", serde_json::to_string(&resolver.resolve(path))?);
        }
        return Ok(());
    }

    let fetcher = HttpImageFetcher::new(config.http.base_url.clone(), &config.http.user_agent)?;
    let cache = Arc::new(MemoryImageCache::new(config.loader.cache_capacity));
    let metrics = Arc::new(MetricsCollector::new());

    let loader = Arc::new(ImageLoader::new(
        config.loader_config(),
        cache.clone(),
        Arc::new(fetcher),
        metrics,
    ));

    let requests = args
        .paths
        .iter()
        .map(|path| ImageRequest::new(path.as_str()).priority())
        .collect();

    let report = LoadGalleryUseCase::new(loader).execute(requests).await;

    for entry in &report.entries {
        println!("{}", serde_json::to_string(entry)?);
    }

    eprintln!(
        "{}/{} loaded ({}%), {} fell back to original. {}",
        report.loaded_count(),
        report.entries.len(),
        report.progress,
        report.failed_count(),
        cache.stats()
    );

    Ok(())
}
