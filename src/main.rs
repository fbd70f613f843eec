use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use halftile::config::{DitherChoice, EditorConfig};
use halftile::imageio;
use tile_mosaic::MosaicEditor;

#[derive(Parser)]
#[command(name = "halftile")]
#[command(about = "Turn images into rearrangeable halftone tile mosaics")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a source PNG into a dithered tile mosaic
    Render {
        /// Source PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file (high-resolution export)
        #[arg(short, long)]
        output: PathBuf,

        /// Also write a scale-1 preview PNG (with selection overlay)
        #[arg(long)]
        preview: Option<PathBuf>,

        /// Optional YAML config with editor defaults
        #[arg(long)]
        config: Option<PathBuf>,

        /// Contrast adjustment in [-255, 255]
        #[arg(long, allow_hyphen_values = true)]
        contrast: Option<i32>,

        /// Block size for the pixelation pass (1 disables it)
        #[arg(long)]
        block_size: Option<u32>,

        /// Dithering algorithm
        #[arg(long, value_enum)]
        dither: Option<DitherChoice>,

        /// Tile-count parameter (columns = tiles * 4)
        #[arg(long)]
        tiles: Option<u32>,

        /// Shuffle all tiles this many times before exporting
        #[arg(long, default_value_t = 0)]
        shuffle: u32,

        /// Seed for reproducible shuffles
        #[arg(long)]
        seed: Option<u64>,

        /// Export scale factor
        #[arg(long)]
        scale: Option<u32>,
    },
    /// Print geometry information for a source PNG
    Info {
        /// Source PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Tile-count parameter to derive geometry for
        #[arg(long, default_value_t = 2)]
        tiles: u32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render {
            input,
            output,
            preview,
            config,
            contrast,
            block_size,
            dither,
            tiles,
            shuffle,
            seed,
            scale,
        }) => run_render_command(
            &input, &output, preview, config, contrast, block_size, dither, tiles, shuffle,
            seed, scale,
        ),
        Some(Commands::Info { input, tiles }) => run_info_command(&input, tiles),
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Render a mosaic PNG from a source image (no interactive surface needed)
#[allow(clippy::too_many_arguments)]
fn run_render_command(
    input: &PathBuf,
    output: &PathBuf,
    preview: Option<PathBuf>,
    config_path: Option<PathBuf>,
    contrast: Option<i32>,
    block_size: Option<u32>,
    dither: Option<DitherChoice>,
    tiles: Option<u32>,
    shuffle: u32,
    seed: Option<u64>,
    scale: Option<u32>,
) -> anyhow::Result<()> {
    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "halftile=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    // Config file supplies defaults; CLI flags override field by field.
    let mut config = EditorConfig::load(config_path.as_deref());
    if let Some(contrast) = contrast {
        config.contrast = contrast;
    }
    if let Some(block_size) = block_size {
        config.block_size = block_size;
    }
    if let Some(dither) = dither {
        config.dither = dither;
    }
    if let Some(tiles) = tiles {
        config.tile_count = tiles;
    }
    if let Some(scale) = scale {
        config.export_scale = scale;
    }

    let params = config.processing_parameters()?;

    let mut editor = match seed {
        Some(seed) => MosaicEditor::with_seed(seed),
        None => MosaicEditor::new(),
    };
    editor.set_parameters(params);
    editor.set_tile_count(config.tile_count)?;
    editor.set_frame_skip(config.frame_skip)?;

    let source = imageio::load_png(input)?;
    tracing::info!(
        width = source.width(),
        height = source.height(),
        "loaded source image"
    );
    editor.set_source(source);
    editor.refresh()?;

    if shuffle > 0 {
        // Select everything with a rubber-band over the whole canvas, then
        // shuffle the requested number of times.
        let canvas = editor.canvas().expect("canvas exists after refresh");
        let (w, h) = (canvas.width() as f32, canvas.height() as f32);
        editor.pointer_down(-1.0, -1.0, true);
        editor.pointer_drag(w + 1.0, h + 1.0);
        editor.pointer_up(w + 1.0, h + 1.0);
        for _ in 0..shuffle {
            editor.request_shuffle();
        }
    }

    if let Some(preview_path) = preview {
        let preview_buffer = editor.preview()?;
        imageio::save_png(&preview_path, &preview_buffer)?;
        println!(
            "Wrote preview {} ({}x{})",
            preview_path.display(),
            preview_buffer.width(),
            preview_buffer.height()
        );
    }

    let export = editor.request_export(config.export_scale)?;
    imageio::save_png(output, &export)?;
    println!(
        "Wrote {} ({}x{}, scale {})",
        output.display(),
        export.width(),
        export.height(),
        config.export_scale
    );

    Ok(())
}

/// Print the canvas and tile geometry a source image would produce
fn run_info_command(input: &PathBuf, tiles: u32) -> anyhow::Result<()> {
    use tile_mosaic::{TileGrid, CANVAS_HEIGHT, CANVAS_WIDTH};

    let source = imageio::load_png(input)?;
    let grid = TileGrid::build(tiles, CANVAS_WIDTH, CANVAS_HEIGHT)?;

    println!("Source:  {} ({}x{})", input.display(), source.width(), source.height());
    println!("Canvas:  {CANVAS_WIDTH}x{CANVAS_HEIGHT}");
    println!(
        "Grid:    {} cols x {} rows = {} tiles",
        grid.cols(),
        grid.rows(),
        grid.len()
    );
    println!(
        "Tile:    {:.2}x{:.2} px",
        grid.tile_width(),
        grid.tile_height()
    );

    Ok(())
}

/// Display status and usage information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("Halftile v{VERSION}");
    println!("Turn images into rearrangeable halftone tile mosaics\n");

    println!("Commands:");
    println!("  halftile render   Render a source PNG into a mosaic export");
    println!("  halftile info     Print geometry for a source PNG");
    println!("\nRun 'halftile --help' for more details.");
}
