/// Picture to point cloud converter main entry point
use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use constants::sampling::DEFAULT_ABSOLUTE_TOLERANCE;
use picture_cloud::export::ExportFormats;
use picture_cloud::{PictureCloudConverter, SampleOptions};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "picture-cloud")]
#[command(about = "Sample pictures placed on planar surfaces into coloured point clouds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert one picture descriptor into a point cloud
    Sample(SampleArgs),
    /// Convert every picture descriptor in a directory
    Batch(BatchArgs),
    /// Validate a descriptor's uniform scale without writing anything
    Check(CheckArgs),
}

#[derive(Args, Debug)]
struct SampleArgs {
    /// Surface descriptor (.json)
    descriptor: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Directory of surface descriptors
    directory: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Surface descriptor (.json)
    descriptor: PathBuf,

    /// Absolute length tolerance, unless the descriptor sets one
    #[arg(long, default_value_t = DEFAULT_ABSOLUTE_TOLERANCE)]
    tolerance: f64,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output directory (default: point_clouds/ next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Absolute length tolerance, unless the descriptor sets one
    #[arg(long, default_value_t = DEFAULT_ABSOLUTE_TOLERANCE)]
    tolerance: f64,

    /// Output formats, repeatable
    #[arg(long = "format", value_enum, default_values_t = [FormatArg::Las, FormatArg::Dds])]
    formats: Vec<FormatArg>,

    /// Hide progress bars and informational logging
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Las,
    Laz,
    Dds,
    All,
}

impl OutputArgs {
    fn export_formats(&self) -> ExportFormats {
        if self.formats.contains(&FormatArg::All) {
            return ExportFormats::all();
        }
        ExportFormats {
            las: self.formats.contains(&FormatArg::Las),
            laz: self.formats.contains(&FormatArg::Laz),
            dds: self.formats.contains(&FormatArg::Dds),
        }
    }

    fn converter(&self, input: &Path) -> PictureCloudConverter {
        let output_dir = self.output.clone().unwrap_or_else(|| {
            let base = if input.is_dir() {
                input
            } else {
                input.parent().unwrap_or(Path::new("."))
            };
            base.join("point_clouds")
        });

        PictureCloudConverter::new(&output_dir)
            .with_formats(self.export_formats())
            .with_tolerance(self.tolerance)
            .with_options(SampleOptions {
                cancellation: None,
                show_progress: !self.quiet,
            })
    }
}

fn init_logging(quiet: bool) {
    let filter = if quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sample(args) => {
            init_logging(args.output.quiet);
            let cloud = args
                .output
                .converter(&args.descriptor)
                .convert(&args.descriptor)
                .with_context(|| format!("Failed to sample {}", args.descriptor.display()))?;
            println!(
                "Sampled '{}': {} points at {} units/pixel",
                cloud.name,
                cloud.point_count,
                cloud.scale_factor.value()
            );
        }
        Commands::Batch(args) => {
            init_logging(args.output.quiet);
            let summary = args
                .output
                .converter(&args.directory)
                .convert_batch(&args.directory)
                .with_context(|| format!("Failed to convert {}", args.directory.display()))?;
            println!(
                "Converted {} pictures, rejected {} (manifest: {})",
                summary.converted,
                summary.rejected,
                summary.manifest_path.display()
            );
        }
        Commands::Check(args) => {
            init_logging(false);
            let converter = PictureCloudConverter::new(Path::new(".")).with_tolerance(args.tolerance);
            match converter.check(&args.descriptor) {
                Ok(scale) => println!("Uniform scale: {} units/pixel", scale.value()),
                Err(err) if err.is_rejection() => bail!("{}: {}", args.descriptor.display(), err),
                Err(err) => return Err(err).context("Failed to check descriptor"),
            }
        }
    }

    Ok(())
}
