use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use epaper_dither::{DitherAlgorithm, Palette, Preset};
use photoframe::models::AppConfig;
use photoframe::services::{
    collect_inputs, palette_store, BatchService, CalibrationService, RenderService, RenderTargets,
};

#[derive(Parser)]
#[command(name = "photoframe")]
#[command(about = "Render photos into packed frames for Spectra-6 e-paper panels")]
struct Cli {
    /// Log pipeline decisions at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by commands that run the pipeline
#[derive(clap::Args)]
struct PipelineArgs {
    /// Config file (display, processing, palette)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Palette JSON, overrides the configured palette
    #[arg(long)]
    palette: Option<PathBuf>,

    /// Named parameter set: "default" or "stock"
    #[arg(long)]
    preset: Option<Preset>,

    /// Dither algorithm, e.g. "floyd-steinberg" or "atkinson"
    #[arg(long)]
    dither: Option<DitherAlgorithm>,

    /// Panel width in pixels
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Panel height in pixels
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Crop instead of rotating images whose orientation differs
    #[arg(long)]
    skip_rotation: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one image into a packed frame
    Render {
        /// Input PNG
        input: PathBuf,

        /// Output frame file
        #[arg(short, long)]
        output: PathBuf,

        /// Also write the dithered image as it will look on the panel
        #[arg(long)]
        preview: Option<PathBuf>,

        /// Also write the tone-mapped image before dithering
        #[arg(long)]
        adjusted: Option<PathBuf>,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Render every PNG in a directory
    Batch {
        /// Directory with input PNGs
        input: PathBuf,

        /// Directory for the frame files
        #[arg(short, long)]
        output: PathBuf,

        /// Also write a preview PNG per frame
        #[arg(long)]
        previews: bool,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Write the calibration test pattern
    Pattern {
        /// Output PNG
        #[arg(short, long)]
        output: PathBuf,

        /// Config file (display size, palette)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Palette JSON, overrides the configured palette
        #[arg(long)]
        palette: Option<PathBuf>,

        #[arg(long, requires = "height")]
        width: Option<u32>,

        #[arg(long, requires = "width")]
        height: Option<u32>,
    },
    /// Measure panel colors from a photo of the test pattern
    Calibrate {
        /// Photo of the panel showing the pattern, cropped to the panel
        capture: PathBuf,

        /// Palette JSON to write
        #[arg(short, long)]
        output: PathBuf,

        /// Palette to start from (defaults to the built-in one)
        #[arg(long)]
        palette: Option<PathBuf>,
    },
    /// Print the effective palette
    Palette {
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long)]
        palette: Option<PathBuf>,
    },
    /// Print the effective processing parameters
    Settings {
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long)]
        preset: Option<Preset>,

        #[arg(long)]
        dither: Option<DitherAlgorithm>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Render {
            input,
            output,
            preview,
            adjusted,
            pipeline,
        } => run_render_command(&input, &output, RenderTargets { preview, adjusted }, &pipeline),
        Commands::Batch {
            input,
            output,
            previews,
            pipeline,
        } => run_batch_command(&input, &output, previews, &pipeline),
        Commands::Pattern {
            output,
            config,
            palette,
            width,
            height,
        } => run_pattern_command(&output, config.as_deref(), palette.as_deref(), width.zip(height)),
        Commands::Calibrate {
            capture,
            output,
            palette,
        } => run_calibrate_command(&capture, &output, palette.as_deref()),
        Commands::Palette { config, palette } => {
            let config = AppConfig::load_or_default(config.as_deref());
            let palette = load_palette(&config, palette.as_deref())?;
            println!("{}", palette_store::to_json(&palette)?);
            Ok(())
        }
        Commands::Settings {
            config,
            preset,
            dither,
        } => {
            let config = AppConfig::load_or_default(config.as_deref());
            let params = config.parameters(preset, dither).sanitized();
            println!("{}", serde_json::to_string_pretty(&params)?);
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "photoframe=debug,epaper_dither=debug"
    } else {
        "photoframe=info,epaper_dither=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Explicit `--palette` wins over the configured one. An explicit file
/// that fails to load is an error rather than a silent fallback.
fn load_palette(config: &AppConfig, path: Option<&Path>) -> anyhow::Result<Palette> {
    match path {
        Some(path) => palette_store::read_palette(path)
            .with_context(|| format!("Failed to load palette {}", path.display())),
        None => Ok(config.load_palette()),
    }
}

fn build_service(args: &PipelineArgs) -> anyhow::Result<RenderService> {
    let config = AppConfig::load_or_default(args.config.as_deref());
    let palette = load_palette(&config, args.palette.as_deref())?;

    let mut display = config.display;
    if let (Some(width), Some(height)) = (args.width, args.height) {
        display = display.with_size(width, height);
    }
    display.skip_rotation |= args.skip_rotation;

    let params = config.parameters(args.preset, args.dither);
    Ok(RenderService::new(display.renderer(palette, params)))
}

fn run_render_command(
    input: &Path,
    output: &Path,
    targets: RenderTargets,
    args: &PipelineArgs,
) -> anyhow::Result<()> {
    let service = build_service(args)?;
    let report = service
        .render_file(input, output, &targets)
        .with_context(|| format!("Failed to render {}", input.display()))?;

    println!(
        "Rendered {} ({} bytes{})",
        report.output.display(),
        report.bytes,
        if report.exact { ", exact palette match" } else { "" }
    );
    Ok(())
}

fn run_batch_command(
    input_dir: &Path,
    output_dir: &Path,
    previews: bool,
    args: &PipelineArgs,
) -> anyhow::Result<()> {
    let inputs = collect_inputs(input_dir)
        .with_context(|| format!("Failed to list {}", input_dir.display()))?;
    if inputs.is_empty() {
        eprintln!("No PNG files in {}", input_dir.display());
        return Ok(());
    }

    let service = build_service(args)?;
    let report = BatchService::new(&service, output_dir)
        .previews(previews)
        .run(&inputs)?;

    println!("Rendered {} files:", report.rendered.len());
    for rendered in &report.rendered {
        println!("  + {}", rendered.output.display());
    }
    if !report.failed.is_empty() {
        println!("Failed {} files:", report.failed.len());
        for (input, reason) in &report.failed {
            println!("  - {}: {reason}", input.display());
        }
        anyhow::bail!("{} of {} files failed", report.failed.len(), inputs.len());
    }
    Ok(())
}

fn run_pattern_command(
    output: &Path,
    config: Option<&Path>,
    palette: Option<&Path>,
    size: Option<(u32, u32)>,
) -> anyhow::Result<()> {
    let config = AppConfig::load_or_default(config);
    let palette = load_palette(&config, palette)?;
    let (width, height) = size.unwrap_or((config.display.width, config.display.height));

    CalibrationService::default()
        .write_pattern(&palette, width, height, output)
        .with_context(|| format!("Failed to write pattern {}", output.display()))?;

    println!("Wrote {}x{} pattern to {}", width, height, output.display());
    Ok(())
}

fn run_calibrate_command(
    capture: &Path,
    output: &Path,
    base: Option<&Path>,
) -> anyhow::Result<()> {
    let mut palette = match base {
        Some(path) => palette_store::read_palette(path)
            .with_context(|| format!("Failed to load palette {}", path.display()))?,
        None => Palette::spectra6(),
    };

    let samples = CalibrationService::default()
        .calibrate_file(&mut palette, capture)
        .with_context(|| format!("Failed to calibrate from {}", capture.display()))?;
    palette_store::write_palette(output, &palette)
        .with_context(|| format!("Failed to write palette {}", output.display()))?;

    println!("Measured {} colorants:", samples.len());
    for sample in &samples {
        println!("  {:>2}  {}  ({} px)", sample.index, sample.rgb, sample.pixels);
    }
    println!("Wrote {}", output.display());
    Ok(())
}
