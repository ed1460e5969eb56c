use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use shedsync::config::Config;
use shedsync::release::ReleaseClient;

#[derive(Parser, Debug)]
struct Args {
    /// Path to YAML config
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let raw = fs::read_to_string(&args.config)?;
    let cfg: Config = serde_yaml::from_str(&raw)?;
    let client = ReleaseClient::new(
        cfg.release_url()?,
        Duration::from_secs(cfg.http.timeout_secs),
    );

    let assets = client.fetch_latest_assets().await?;
    println!("Latest release assets: {}", assets.len());
    for asset in assets {
        let location = match (&asset.town, asset.block) {
            (Some(town), _) => format!("town {town}"),
            (None, Some(block)) => format!("block {block}"),
            (None, None) => "unclassified".to_string(),
        };
        println!(
            "  {} -> {{ province: {:?}, {}, downloads: {} }}",
            asset.name, asset.province, location, asset.download_count
        );
    }
    Ok(())
}
