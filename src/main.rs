use clap::{Parser, Subcommand};
use std::path::PathBuf;
use yearbook::imaging::RustBackend;
use yearbook::{config, output, pipeline, scan, video};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "yearbook")]
#[command(about = "Incremental build pipeline for year-organized photo and video timelines")]
#[command(long_about = "\
Incremental build pipeline for year-organized photo and video timelines

Your filesystem is the data source. Year-named directories (1900-2100)
hold photos and videos; each photo becomes a bounded AVIF rendition and
thumbnail with JPEG fallbacks, videos are copied verbatim with an
optional ffmpeg poster frame, and everything is described by one JSON
timeline catalog.

Source structure:

  photos/
  ├── config.toml                  # Optional encoding overrides
  ├── 2018/
  │   ├── IMG_20180305_143000.jpg  # Capture time from EXIF or filename
  │   └── clip.mp4                 # Copied verbatim, poster via ffmpeg
  └── 2019/
      └── beach.png

Output structure:

  site/
  ├── assets/2018/                 # Derived renditions, one dir per year
  └── data/timeline.json           # The timeline catalog

Capture times come from EXIF tags, then filename markers (IMG_/VID_/
C360_, epoch milliseconds, loose dates); the year directory always has
the final say on the year. Re-runs regenerate only assets whose sources
changed and sweep derived files whose sources are gone.

Run 'yearbook gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Directory of year-named subdirectories with photos and videos
    #[arg(long, default_value = "photos", global = true)]
    source: PathBuf,

    /// Output directory for derived assets and the catalog
    #[arg(long, default_value = "site", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Clone)]
struct BuildArgs {
    /// Regenerate every asset, ignoring modification times
    #[arg(long)]
    force: bool,

    /// Override the primary rendition bound from config.toml
    #[arg(long)]
    max_size: Option<u32>,

    /// Override the thumbnail bound from config.toml
    #[arg(long)]
    thumb_size: Option<u32>,
}

#[derive(Subcommand)]
enum Command {
    /// Build derived assets and the timeline catalog
    Build(BuildArgs),
    /// Inventory the source tree without building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build(args) => {
            let mut settings = config::load_settings(&cli.source)?;
            if let Some(max_size) = args.max_size {
                settings.images.max_size = max_size;
            }
            if let Some(thumb_size) = args.thumb_size {
                settings.images.thumb_size = thumb_size;
            }
            settings.validate()?;
            let options = pipeline::BuildOptions::from_settings(&settings, args.force);

            let backend = RustBackend::new();
            let extractor = video::FrameExtractor::detect();
            if !extractor.is_available() {
                println!("Note: ffmpeg not found, videos get a placeholder thumbnail");
            }

            println!(
                "==> Building {} \u{2192} {}",
                cli.source.display(),
                cli.output.display()
            );
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_build_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let report = pipeline::build_with_backend(
                &backend,
                &extractor,
                &cli.source,
                &cli.output,
                &options,
                Some(tx),
            )?;
            printer.join().unwrap();
            output::print_build_summary(&report);
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let rows = scan::inventory(&cli.source)?;
            output::print_check_output(&rows);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
