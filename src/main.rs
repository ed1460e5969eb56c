use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use shedsync::areas;
use shedsync::config;
use shedsync::service::SyncService;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Province key to drill into (e.g. "western-cape")
    #[arg(long)]
    province: Option<String>,

    /// Area name to resolve to a calendar link (e.g. "gauteng-4")
    #[arg(long)]
    area: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let mut cfg = config::load(Some(&args.config))?;
    if let Ok(url) = std::env::var("SHEDSYNC_BACKEND_URL") {
        cfg.backend.base_url = url;
    }

    let service = SyncService::from_config(&cfg)?;

    info!("starting full sync");
    let snapshot = service.sync_all().await?;

    println!("Provinces:");
    for province in service.list_provinces() {
        println!("  {}  ({})", province.value, province.key);
    }

    println!(
        "\nSynced {} calendar assets and {} outage records.",
        snapshot.assets.len(),
        snapshot.records.len()
    );

    let top = areas::top_downloads(&snapshot.assets, 5);
    if !top.is_empty() {
        println!("\nTop downloads:");
        for asset in top {
            println!("  {}  ({} downloads)", asset.name, asset.download_count);
        }
    }

    if let Some(key) = args.province.as_deref() {
        let backend_areas = service.areas_for_province(key).await?;
        println!("\nAreas in {key} (backend): {}", backend_areas.len());
        for group in &backend_areas {
            println!("  {}  block {}", group.area_name, group.block);
        }

        let local = areas::filter_by_province(&snapshot.assets, key);
        println!("Calendars matching {key} (release feed): {}", local.len());
        let grouped = areas::group_areas(&snapshot.records);
        let in_province = grouped.iter().filter(|g| g.province == key).count();
        println!("Distinct synced areas in {key}: {in_province}");
    }

    if let Some(area) = args.area.as_deref() {
        match service.asset_for_area(area).await? {
            Some(asset) => {
                let link = asset.calendar_link();
                println!("\n{area}:");
                println!("  download:  {}", asset.browser_download_url);
                println!("  subscribe: {} ({})", link.url, link.format);
                let suburbs = service.suburbs_for_area(area).await?;
                if suburbs.is_empty() {
                    println!("  no suburb data");
                } else {
                    for suburb in suburbs {
                        println!("  suburb: {} (block {})", suburb.sub_name, suburb.block_id);
                    }
                }
            }
            None => println!("\nNo calendar found for {area}."),
        }
    }

    Ok(())
}
