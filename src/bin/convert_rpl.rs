use clap::Parser;
use rpl_converter::RplConverter;
use std::fs;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "convert-rpl")]
#[command(about = "Convert a route position list workbook (.xlsx) into an HDF5 container", long_about = None)]
struct Cli {
    /// Path to the RPL workbook
    input: PathBuf,

    /// Directory to write the .h5 file to (default: next to the input)
    #[arg(long, env = "RPL_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if it exists (ignore errors if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let output_dir = match cli.output_dir {
        Some(dir) => dir,
        None => cli
            .input
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    fs::create_dir_all(&output_dir)?;

    let source_name = cli
        .input
        .file_name()
        .ok_or("input path has no file name")?
        .to_string_lossy()
        .into_owned();

    info!("Reading {}", cli.input.display());
    let workbook = fs::read(&cli.input)?;

    match RplConverter::new().convert(&workbook, &source_name, &output_dir) {
        Ok(path) => {
            println!("✅ Wrote {}", path.display());
            Ok(())
        }
        Err(e) => {
            error!("Conversion failed: {}", e);
            Err(e.into())
        }
    }
}
