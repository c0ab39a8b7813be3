use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use futures_util::future::join_all;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use shelfwarm::application::CategoryImageCache;
use shelfwarm::domain::Category;
use shelfwarm::infrastructure::{
    AppConfig, CliArgs, ConfigStore, DiskImageCache, HttpImagePrefetcher, RestDataStore,
    StorageUrlBuilder,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

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
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let store = ConfigStore::new()?;
    let mut config = store.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

async fn create_cache(config: &AppConfig) -> Result<(CategoryImageCache, Arc<DiskImageCache>)> {
    if config.backend.url.is_empty() {
        return Err(eyre!(
            "backend URL is not configured (set [backend].url or SHELFWARM_BACKEND_URL)"
        ));
    }

    let store = RestDataStore::new(
        config.backend.url.clone(),
        config.backend.anon_key.clone(),
        config.backend.items_table.clone(),
        config.backend.timeout_secs,
    )?;

    let disk_cache = Arc::new(
        DiskImageCache::new(
            config.image_cache.effective_dir(),
            config.image_cache.max_disk_bytes,
        )
        .await
        .wrap_err("Failed to open image cache")?,
    );

    let prefetcher = HttpImagePrefetcher::new(
        config.image_cache.to_prefetcher_config(),
        Arc::clone(&disk_cache),
    )?;

    let cache = CategoryImageCache::new(
        Arc::new(store),
        Arc::new(prefetcher),
        Arc::new(StorageUrlBuilder::new(config.backend.url.clone())),
        config.preload.to_preload_config(),
    );
    Ok((cache, disk_cache))
}

fn parse_categories(labels: &[String]) -> Result<Vec<Category>> {
    labels
        .iter()
        .map(|label| label.parse::<Category>().map_err(|e| eyre!(e)))
        .collect()
}

async fn run(cache: &CategoryImageCache, args: &CliArgs) -> Result<()> {
    if let Some(label) = &args.adjacent {
        let category: Category = label.parse().map_err(|e: String| eyre!(e))?;
        for result in join_all(cache.preload_adjacent(category)).await {
            if let Err(e) = result {
                warn!(error = %e, "Preload task failed");
            }
        }
    } else if args.categories.is_empty() {
        let summary = cache.initialize_all().await?;
        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Warm-up finished"
        );
    } else {
        let handles: Vec<_> = parse_categories(&args.categories)?
            .into_iter()
            .map(|category| cache.spawn_preload(category, args.background))
            .collect();
        for result in join_all(handles).await {
            if let Err(e) = result {
                warn!(error = %e, "Preload task failed");
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let config = load_config(&args)?;

    init_logging(&config)?;

    info!(version = shelfwarm::VERSION, "Starting shelfwarm");

    let (cache, disk_cache) = create_cache(&config).await?;
    run(&cache, &args).await?;

    let finished_at = chrono::Utc::now();
    println!("Cache status at {}", finished_at.format("%Y-%m-%d %H:%M:%S UTC"));
    for status in cache.statuses() {
        println!("  {status}");
    }
    println!(
        "Disk cache: {} images, {} KiB",
        disk_cache.len(),
        disk_cache.size_bytes() / 1024
    );

    Ok(())
}
