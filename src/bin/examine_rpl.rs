use calamine::DataType;
use clap::Parser;
use rpl_converter::rpl::{read_first_sheet, RplColumn};
use rpl_converter::RplConverter;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "examine-rpl")]
#[command(about = "Inspect the raw rows or the normalized records of an RPL workbook", long_about = None)]
struct Cli {
    /// Path to the RPL workbook
    input: PathBuf,

    /// Number of raw rows to print
    #[arg(long, default_value = "20")]
    rows: usize,

    /// Print normalized records and header metadata as JSON instead of raw rows
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let workbook = fs::read(&cli.input)?;

    if cli.json {
        let (table, metadata) = RplConverter::new().normalize(&workbook)?;
        let output = serde_json::json!({
            "metadata": metadata,
            "records": table.records,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Opening RPL file: {}", cli.input.display());
    let sheet = read_first_sheet(&workbook)?;

    println!("Dimensions: {:?}", sheet.range().get_size());
    println!("\nFirst {} rows (16 data columns):", cli.rows);
    println!("{}", "=".repeat(100));

    for row_idx in 0..sheet.height().min(cli.rows) {
        let row = sheet.row(row_idx);
        // Only print rows with data
        if row.cells().iter().all(|cell| cell.is_empty()) {
            continue;
        }
        println!("Row {:3}:", row_idx + 1);
        for column in RplColumn::ALL {
            let cell = row.get(column);
            if !cell.is_empty() {
                println!("  {:<24} [{cell}]", column.label());
            }
        }
    }

    Ok(())
}
