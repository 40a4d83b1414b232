use clap::Parser;
use std::fs;
use std::path::PathBuf;
use color_cluster_wasm::{ClusterConfig, entropy_seed, segment_bytes};
use color_cluster_wasm::kmeans::{DEFAULT_K, DEFAULT_MAX_ITERATIONS};
use color_cluster_wasm::session::DEFAULT_MAX_SIDE;
use anyhow::{Context, Result, anyhow};
use log::info;

/// Segment images by colour with k-means in RGB space.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Number of clusters
    #[arg(short = 'k', long, default_value_t = DEFAULT_K)]
    clusters: usize,

    /// Maximum k-means iterations
    #[arg(short = 'i', long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,

    /// Seed for the initial centroids. Random when omitted.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Longest side images are downsampled to before clustering
    #[arg(short = 'm', long, default_value_t = DEFAULT_MAX_SIDE)]
    max_side: u32,

    /// Output directory
    #[arg(short = 'd', long)]
    out_dir: Option<PathBuf>,

    /// Output filename prefix (ignored when --out-dir supplied)
    #[arg(short = 'p', long, default_value = "segmented_")]
    prefix: String,

    /// Print a JSON summary per image instead of plain text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let seed = match args.seed {
        Some(s) => s,
        None => entropy_seed().map_err(|e| anyhow!("no entropy for seed: {e}"))?,
    };
    let config = ClusterConfig {
        k: args.clusters,
        max_iterations: args.max_iterations,
        seed,
    };
    info!("clustering with k = {}, max_iterations = {}, seed = {seed}", config.k, config.max_iterations);

    for input in &args.inputs {
        let bytes = fs::read(input).with_context(|| format!("read {}", input.display()))?;
        let (png, palette) = segment_bytes(&bytes, &config, args.max_side)
            .with_context(|| format!("segment {}", input.display()))?;

        let stem = input
            .file_stem()
            .ok_or_else(|| anyhow!("no file name in {}", input.display()))?
            .to_string_lossy();
        let out_path = if let Some(dir) = &args.out_dir {
            dir.join(format!("{stem}.png"))
        } else {
            PathBuf::from(format!("{}{stem}.png", args.prefix))
        };

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&out_path, png)?;

        if args.json {
            let summary = serde_json::json!({
                "input": input.display().to_string(),
                "output": out_path.display().to_string(),
                "seed": seed,
                "palette": palette,
            });
            println!("{summary}");
        } else {
            println!("Saved → {} [{}]", out_path.display(), palette.join(" "));
        }
    }

    Ok(())
}
