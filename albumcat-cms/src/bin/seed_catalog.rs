//! seed-catalog - fill the catalog file with generated demo albums
//!
//! Refuses to replace a catalog that already holds albums unless `--force`.

use std::path::PathBuf;

use albumcat_cms::store::CatalogStore;
use albumcat_common::config::CompiledDefaults;
use albumcat_common::mock::mock_albums;
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "seed-catalog")]
#[command(about = "Write a generated demo catalog")]
struct Args {
    /// Catalog JSON file
    #[arg(long, env = "ALBUMCAT_CATALOG")]
    catalog: Option<PathBuf>,

    /// Number of albums to generate
    #[arg(short = 'n', long, default_value = "150")]
    count: usize,

    /// Replace a non-empty catalog
    #[arg(long)]
    force: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let path = args
        .catalog
        .unwrap_or_else(|| CompiledDefaults::get().catalog_path);

    let store = CatalogStore::init(path).await?;
    let albums = mock_albums(&mut rand::thread_rng(), args.count, chrono::Utc::now());
    store
        .seed(&albums, args.force)
        .await
        .with_context(|| format!("Failed to seed {} (pass --force to replace it)", store.path().display()))?;
    info!("Wrote {} demo album(s) to {}", albums.len(), store.path().display());

    Ok(())
}
