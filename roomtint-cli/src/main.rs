// roomtint command line interface
// Inspect the material catalog, extract regions from recorded segmentation
// output and preview a full editing session.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use roomtint_core::{Category, RawSegment, TintConfig};
use roomtint_eye::processing::ingest;
use roomtint_eye::{
    AssetCache, FsAssetLoader, HeuristicOrientation, MaskEncoder, PointerEvent, RecordedBackend,
    RegionIndex, SessionController, SessionEvent,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roomtint")]
#[command(about = "Recolor and retexture walls, floors and ceilings of interior photos", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (JSON, TOML or YAML)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the material catalog
    Catalog {
        /// Only show one category (wall, floor, ceiling)
        #[arg(long)]
        category: Option<Category>,
    },

    /// Extract regions from recorded segmentation output
    Regions {
        /// Recorded segments (JSON array of {label, mask})
        #[arg(long, short)]
        segments: PathBuf,

        /// Write each stencil as region-<id>.png into this directory
        #[arg(long, short)]
        out_dir: Option<PathBuf>,
    },

    /// Run a full session and print the snapshot and render layers
    Preview {
        /// Recorded segments (JSON array of {label, mask})
        #[arg(long, short)]
        segments: PathBuf,

        /// Reference of the uploaded image
        #[arg(long, short)]
        image: String,

        /// Rendered size of the image, WxH
        #[arg(long, short, value_parser = parse_display)]
        display: (f32, f32),

        /// Click position in display pixels, X,Y
        #[arg(long, value_parser = parse_click)]
        click: Option<(f32, f32)>,

        /// Material to apply to the clicked region
        #[arg(long, short, requires = "click")]
        material: Option<String>,
    },
}

fn parse_pair(value: &str, separator: char) -> Result<(f32, f32), String> {
    let (a, b) = value
        .split_once(separator)
        .ok_or_else(|| format!("expected two numbers separated by '{}'", separator))?;
    let a: f32 = a.trim().parse().map_err(|e| format!("{}: {}", a, e))?;
    let b: f32 = b.trim().parse().map_err(|e| format!("{}: {}", b, e))?;
    if !a.is_finite() || !b.is_finite() {
        return Err("values must be finite".to_string());
    }
    Ok((a, b))
}

fn parse_display(value: &str) -> Result<(f32, f32), String> {
    let (w, h) = parse_pair(&value.to_ascii_lowercase(), 'x')?;
    if w <= 0.0 || h <= 0.0 {
        return Err("display size must be positive".to_string());
    }
    Ok((w, h))
}

fn parse_click(value: &str) -> Result<(f32, f32), String> {
    parse_pair(value, ',')
}

fn load_config(path: Option<&Path>) -> anyhow::Result<TintConfig> {
    let config = match path {
        Some(path) => TintConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => TintConfig::default(),
    }
    .from_env();
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn init_logging(verbose: bool, log_level: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_logging(cli.verbose, &config.log_level);

    match cli.command {
        Commands::Catalog { category } => show_catalog(&config, category),
        Commands::Regions { segments, out_dir } => {
            extract_regions(&config, &segments, out_dir.as_deref()).await
        }
        Commands::Preview {
            segments,
            image,
            display,
            click,
            material,
        } => preview(config, &segments, image, display, click, material).await,
    }
}

fn show_catalog(config: &TintConfig, only: Option<Category>) -> anyhow::Result<()> {
    let categories: Vec<Category> = match only {
        Some(category) => vec![category],
        None => Category::ALL.to_vec(),
    };

    for category in categories {
        println!("{}", category.display_name());
        for material in config.catalog.materials(category) {
            let fill = match (material.texture_ref(), material.rgb()) {
                (Some(image), _) => format!("texture {}", image),
                (None, Some(rgb)) => format!("color {}", rgb),
                (None, None) => "invalid color".to_string(),
            };
            println!("  {:<18} {:<24} {}", material.id, material.name, fill);
        }
    }
    Ok(())
}

async fn read_segments(path: &Path) -> anyhow::Result<Vec<RawSegment>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid segments in {}", path.display()))
}

async fn extract_regions(
    config: &TintConfig,
    segments: &Path,
    out_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let raw = read_segments(segments).await?;
    let total = raw.len();
    let regions = RegionIndex::build(
        ingest(raw),
        &MaskEncoder::new(&config.encoder),
        &HeuristicOrientation::new(config.orientation.clone()),
    );
    info!("Extracted {} regions from {} segments", regions.len(), total);

    if let Some(dir) = out_dir {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    for region in regions.iter() {
        println!(
            "{:>3}  {:<8} {:<24} x {}..={}  {} px  {}",
            region.id.0,
            region.category.as_str(),
            region.label,
            region.bounding_box.min_x,
            region.bounding_box.max_x,
            region.stencil.coverage,
            region.orientation.to_css()
        );

        if let Some(dir) = out_dir {
            let path = dir.join(format!("region-{}.png", region.id));
            tokio::fs::write(&path, region.stencil.png_bytes())
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            debug!("Wrote {}", path.display());
        }
    }
    Ok(())
}

async fn preview(
    config: TintConfig,
    segments: &Path,
    image: String,
    display: (f32, f32),
    click: Option<(f32, f32)>,
    material: Option<String>,
) -> anyhow::Result<()> {
    let assets = AssetCache::global();
    let loader = FsAssetLoader::new(&config.assets.texture_root);
    let backend = RecordedBackend::from_file(config.inference.model_id.clone(), segments);
    let mut session = SessionController::new(config, assets.clone());

    let report = assets.preload(&session.texture_refs(), &loader).await;
    if report.failed > 0 {
        eprintln!(
            "{} textures unavailable, their materials render as placeholders",
            report.failed
        );
    }

    let mut events = session.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(SessionEvent::Status(status)) => {
                    eprintln!("[{}] {}", status.as_str(), status.message());
                }
                Ok(_) | Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });

    let count = session.run_inference(image, &backend).await?;
    info!("Session ready with {} regions", count);

    if let Some((x, y)) = click {
        let pointer = PointerEvent::new(x, y, display.0, display.1);
        match session.select_at(&pointer)? {
            Some(id) => {
                info!("Selected region {}", id);
                if let Some(material_id) = material.as_deref() {
                    session.apply_by_id(material_id)?;
                }
            }
            None => {
                if material.is_some() {
                    bail!("No region at ({}, {}) to apply a material to", x, y);
                }
            }
        }
    }

    let output = json!({
        "snapshot": session.snapshot(),
        "active_material": session.active_material(),
        "layers": session.layers(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    drop(session);
    printer.await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display() {
        assert_eq!(parse_display("800x600").unwrap(), (800.0, 600.0));
        assert_eq!(parse_display("800X600").unwrap(), (800.0, 600.0));
        assert!(parse_display("800").is_err());
        assert!(parse_display("0x600").is_err());
    }

    #[test]
    fn test_parse_click() {
        assert_eq!(parse_click("12.5, 40").unwrap(), (12.5, 40.0));
        assert!(parse_click("12;40").is_err());
    }

    #[test]
    fn test_cli_parses_preview() {
        let cli = Cli::try_parse_from([
            "roomtint",
            "preview",
            "--segments",
            "segments.json",
            "--image",
            "room.jpg",
            "--display",
            "400x300",
            "--click",
            "10,20",
            "--material",
            "wall-brick",
        ])
        .unwrap();
        match cli.command {
            Commands::Preview {
                display, click, material, ..
            } => {
                assert_eq!(display, (400.0, 300.0));
                assert_eq!(click, Some((10.0, 20.0)));
                assert_eq!(material.as_deref(), Some("wall-brick"));
            }
            _ => panic!("expected preview"),
        }
    }

    #[test]
    fn test_material_requires_click() {
        let result = Cli::try_parse_from([
            "roomtint",
            "preview",
            "--segments",
            "s.json",
            "--image",
            "room.jpg",
            "--display",
            "400x300",
            "--material",
            "wall-brick",
        ]);
        assert!(result.is_err());
    }
}
