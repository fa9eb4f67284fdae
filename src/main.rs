use clap::{Parser, Subcommand};
use imgshift::config::{self, ImgshiftConfig};
use imgshift::convert::{self, ConvertEvent};
use imgshift::download::DirectoryDownloads;
use imgshift::imaging::{Quality, RustBackend};
use imgshift::input;
use imgshift::output;
use imgshift::preferences::{DEFAULT_STATE_DIR, Preferences, ThemeChange};
use imgshift::registry::Registry;
use imgshift::types::{CompressionLevel, OutputFormat, ResizeMode};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "imgshift")]
#[command(version)]
#[command(about = "Convert and resize images to JPEG, PNG, WebP, or PDF")]
#[command(long_about = "\
Convert and resize images to JPEG, PNG, WebP, or PDF

Single image:
  imgshift convert photo.jpg --format png --width 800
    -> converted/photo.png (height derived from the aspect ratio)

Batch:
  imgshift batch shots/ extra.png --resize fit --max-width 1920 --max-height 1080
    -> converted/<name>_converted.jpg for every image

Batch resize modes (both --max-width and --max-height are needed to resize):
  none   keep the current size
  fit    shrink to fit inside the bounds, never enlarge
  fill   cover the bounds; with --free-aspect, stretch to exactly the bounds

Batch compression adjusts --quality:
  low    at least 85
  medium between 70 and 85
  high   at most 70

Originals:
  imgshift export shots/
    -> converted/<original file name> for every image, bytes untouched

Directories are searched recursively for jpg, png, webp, gif, bmp, and tiff
files. Files named directly are always attempted.

Run 'imgshift gen-config' to generate a documented imgshift.toml.")]
struct Cli {
    /// Config file (default: ./imgshift.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output directory for converted files
    #[arg(long, default_value = "converted", global = true)]
    output: PathBuf,

    /// Directory for persisted preferences
    #[arg(long, default_value = DEFAULT_STATE_DIR, global = true)]
    state_dir: PathBuf,

    /// Log debug details to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert one image with explicit dimensions
    Convert(ConvertArgs),
    /// Convert many images with shared settings
    Batch(BatchArgs),
    /// Copy images unchanged into the output directory
    Export {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// List images with their dimensions and sizes
    Info {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Show or change the light/dark preference
    Theme { change: Option<ThemeChange> },
    /// Print a stock imgshift.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct ConvertArgs {
    file: PathBuf,
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
    /// Encoding quality (10-100)
    #[arg(long, value_parser = clap::value_parser!(u32).range(10..=100))]
    quality: Option<u32>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    /// Don't derive the missing dimension from the aspect ratio
    #[arg(long)]
    free_aspect: bool,
}

#[derive(clap::Args)]
struct BatchArgs {
    /// Image files and/or directories
    #[arg(required = true)]
    paths: Vec<PathBuf>,
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
    /// Baseline quality (10-100), adjusted by --compression
    #[arg(long, value_parser = clap::value_parser!(u32).range(10..=100))]
    quality: Option<u32>,
    #[arg(long, value_enum)]
    resize: Option<ResizeMode>,
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_width: Option<u32>,
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_height: Option<u32>,
    #[arg(long, value_enum)]
    compression: Option<CompressionLevel>,
    /// Let fill stretch to the exact bounds
    #[arg(long)]
    free_aspect: bool,
    /// Images converted at once (capped at CPU cores)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    workers: Option<u64>,
    /// Pause between images in milliseconds
    #[arg(long)]
    pause_ms: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Convert(args) => {
            let config = load_config(cli.config.as_deref())?;
            let mut settings = config.convert.to_settings();
            if let Some(format) = args.format {
                settings.format = format;
            }
            if let Some(quality) = args.quality {
                settings.quality = Quality::new(quality);
            }
            settings.width = args.width;
            settings.height = args.height;
            if args.free_aspect {
                settings.maintain_aspect_ratio = false;
            }

            let backend = RustBackend::new();
            let mut registry = Registry::new();
            let sources = input::read_sources(&[args.file])?;
            let ids = registry.add(&backend, sources)?;
            let id = ids.first().copied().ok_or("no image loaded")?;
            let downloads = DirectoryDownloads::create(&cli.output)?;

            let (tx, printer) = spawn_printer();
            let result =
                convert::convert_image(&backend, &mut registry, id, &settings, &downloads, Some(tx));
            printer.join().map_err(|_| "progress printer panicked")?;
            result?;
        }
        Command::Batch(args) => {
            let mut config = load_config(cli.config.as_deref())?;
            apply_batch_args(&mut config, &args);
            config.validate()?;
            let settings = config.batch.to_settings();

            let files = input::collect_inputs(&args.paths)?;
            if files.is_empty() {
                return Err("no images found".into());
            }

            let backend = RustBackend::new();
            let mut registry = Registry::new();
            registry.add(&backend, input::read_sources(&files)?)?;
            let downloads = DirectoryDownloads::create(&cli.output)?;

            let (tx, printer) = spawn_printer();
            let result =
                convert::batch_convert(&backend, &mut registry, &settings, &downloads, Some(tx));
            printer.join().map_err(|_| "progress printer panicked")?;
            result?;
        }
        Command::Export { paths } => {
            let files = input::collect_inputs(&paths)?;
            let mut registry = Registry::new();
            registry.add(&RustBackend::new(), input::read_sources(&files)?)?;
            let downloads = DirectoryDownloads::create(&cli.output)?;
            for path in convert::export_originals(&registry, &downloads)? {
                println!("{}", path.display());
            }
        }
        Command::Info { paths } => {
            let files = input::collect_inputs(&paths)?;
            let mut registry = Registry::new();
            registry.add(&RustBackend::new(), input::read_sources(&files)?)?;
            output::print_info(registry.images());
        }
        Command::Theme { change } => {
            let mut prefs = Preferences::load(&cli.state_dir);
            if let Some(change) = change {
                prefs.apply(change);
                prefs.save(&cli.state_dir)?;
            }
            println!("{}", output::format_theme(&prefs));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the fmt subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "imgshift=debug"
    } else {
        "imgshift=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(explicit: Option<&Path>) -> Result<ImgshiftConfig, config::ConfigError> {
    match explicit {
        Some(path) => config::load_explicit_config(path),
        None => config::load_config(Path::new(config::DEFAULT_CONFIG_FILE)),
    }
}

/// Layer batch flags over the config file values.
fn apply_batch_args(config: &mut ImgshiftConfig, args: &BatchArgs) {
    let batch = &mut config.batch;
    if let Some(format) = args.format {
        batch.format = format;
    }
    if let Some(quality) = args.quality {
        batch.quality = quality;
    }
    if let Some(mode) = args.resize {
        batch.resize_mode = mode;
    }
    if args.max_width.is_some() {
        batch.max_width = args.max_width;
    }
    if args.max_height.is_some() {
        batch.max_height = args.max_height;
    }
    if let Some(level) = args.compression {
        batch.compression = level;
    }
    if args.free_aspect {
        batch.maintain_aspect_ratio = false;
    }
    if let Some(workers) = args.workers {
        batch.workers = usize::try_from(workers).unwrap_or(usize::MAX);
    }
    if let Some(pause_ms) = args.pause_ms {
        batch.pause_ms = pause_ms;
    }
}

/// Print progress events on a separate thread until the sender is dropped.
fn spawn_printer() -> (Sender<ConvertEvent>, JoinHandle<()>) {
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_convert_event(&event) {
                println!("{}", line);
            }
        }
    });
    (tx, printer)
}
