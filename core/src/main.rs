use clap::{Parser, Subcommand, ValueEnum};
use image::GenericImageView;
use log::{error, info};
use sonoglean_core::{MeasurementParser, Result, TextReport};
use std::path::{Path, PathBuf};
use std::process;

/// Developer tooling over the measurement-recovery pipeline
#[derive(Parser, Debug)]
#[command(name = "sonoglean")]
#[command(about = "Recover burned-in measurements from medical image text")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse recognition-engine text output into measurement records
    Parse {
        /// Text file holding raw recognition output
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Run the image preprocessing pipeline and write the prepared image
    ///
    /// Useful for inspecting exactly what a recognition engine would see.
    Prepare {
        /// Input image (any format the image crate decodes)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Path for the prepared binary image
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    match cli.command {
        Command::Parse { file, format } => run_parse(&file, format),
        Command::Prepare { input, output } => run_prepare(&input, &output),
    }
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}

fn run_parse(file: &Path, format: OutputFormat) {
    let measurements = match parse_file(file) {
        Ok(measurements) => measurements,
        Err(e) => {
            error!("failed to read {}: {}", file.display(), e);
            eprintln!("Error: failed to read {}: {}", file.display(), e);
            process::exit(1);
        }
    };

    info!("recovered {} measurements", measurements.len());

    match format {
        OutputFormat::Text => {
            println!("{}", TextReport::new(&measurements));
        }
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            {
                match serde_json::to_string_pretty(&measurements) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        error!("failed to serialize to JSON: {}", e);
                        eprintln!("Error: failed to serialize to JSON: {}", e);
                        process::exit(1);
                    }
                }
            }
            #[cfg(not(feature = "json"))]
            {
                eprintln!("Error: JSON output requires the 'json' feature");
                eprintln!("Rebuild with: cargo build --features json");
                process::exit(1);
            }
        }
    }
}

fn run_prepare(input: &Path, output: &Path) {
    match prepare_file(input, output) {
        Ok((width, height)) => {
            info!("wrote prepared image to {}", output.display());
            println!("Wrote {} ({}x{})", output.display(), width, height);
        }
        Err(e) => {
            error!("failed to prepare {}: {}", input.display(), e);
            eprintln!("Error: failed to prepare {}: {}", input.display(), e);
            process::exit(1);
        }
    }
}

fn parse_file(file: &Path) -> Result<Vec<sonoglean_core::Measurement>> {
    let text = std::fs::read_to_string(file)?;
    Ok(MeasurementParser::new().parse(&text))
}

fn prepare_file(input: &Path, output: &Path) -> Result<(u32, u32)> {
    let image = image::open(input)?;
    info!(
        "preparing {} ({}x{})",
        input.display(),
        image.width(),
        image.height()
    );

    let prepared = sonoglean_core::preprocess::prepare(&image);
    prepared.save(output)?;

    Ok(prepared.dimensions())
}
