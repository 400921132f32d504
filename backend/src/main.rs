//! Campgen CLI - Turn campaign parameter CSVs into bulk upload spreadsheets
//!
//! # Main Commands
//!
//! ```bash
//! campgen generate input.csv                      # Write campaign.xlsx (or error_report.csv)
//! campgen generate input.csv --cross-negation no  # Skip negative exact keywords
//! campgen validate input.csv                      # Only check the rows
//! campgen serve                                   # Start HTTP server (port 3000)
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! campgen parse input.csv          # Just parse CSV to JSON
//! ```

use campgen::config::{parse_yes_no, ServerConfig, CAMPAIGN_FILE_NAME, ERROR_REPORT_FILE_NAME};
use campgen::{
    generate_from_path, parse_csv_file_auto, records_to_json, validate_path, write_campaign_file,
    write_error_report, GenerateOptions, Outcome,
};
use clap::{ArgAction, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "campgen")]
#[command(about = "Generate Sponsored Products bulk upload files from a CSV", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a CSV file and output JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a CSV file and list every problem
    Validate {
        /// Input CSV file
        input: PathBuf,

        /// Also write the problems as an error report CSV
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Full run: CSV → validation → bulk upload spreadsheet
    Generate {
        /// Input CSV file
        input: PathBuf,

        /// Broad and Phrase Campaign Cross Negation (yes/no)
        #[arg(
            long,
            default_value = "yes",
            value_parser = parse_cross_negation,
            action = ArgAction::Set
        )]
        cross_negation: bool,

        /// Spreadsheet to write on success
        #[arg(short, long, default_value = CAMPAIGN_FILE_NAME)]
        output: PathBuf,

        /// Error report to write when validation fails
        #[arg(short, long, default_value = ERROR_REPORT_FILE_NAME)]
        errors: PathBuf,

        /// Also dump the generated records as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on (default: CAMPGEN_PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn parse_cross_negation(value: &str) -> Result<bool, String> {
    parse_yes_no(value).ok_or_else(|| format!("expected yes or no, got '{}'", value))
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),

        Commands::Validate { input, report } => cmd_validate(&input, report.as_deref()),

        Commands::Generate {
            input,
            cross_negation,
            output,
            errors,
            json,
        } => cmd_generate(&input, cross_negation, &output, &errors, json.as_deref()),

        Commands::Serve { port } => cmd_serve(port).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let result = parse_csv_file_auto(input)?;

    eprintln!("   Encoding: {}", result.encoding);
    eprintln!("   Delimiter: '{}'", format_delimiter(result.delimiter));
    eprintln!("   Columns: {}", result.headers.join(", "));
    eprintln!("✅ Parsed {} records", result.records.len());

    let json = serde_json::to_string_pretty(&result.records)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_validate(input: &Path, report: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("✔️  Validating: {}", input.display());

    let (csv_info, errors) = validate_path(input)?;

    if errors.is_empty() {
        eprintln!("\n✅ All {} rows valid!", csv_info.row_count);
        return Ok(());
    }

    for err in &errors {
        eprintln!("   - {}", err);
    }
    eprintln!("\n📊 {} problems in {} rows", errors.len(), csv_info.row_count);

    if let Some(path) = report {
        write_error_report(path, &errors)?;
        eprintln!("💾 Error report written to: {}", path.display());
    }

    std::process::exit(1);
}

fn cmd_generate(
    input: &Path,
    cross_negation: bool,
    output: &Path,
    errors_path: &Path,
    json: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Processing: {}", input.display());

    let result = generate_from_path(input, GenerateOptions { cross_negation })?;

    eprintln!("   Encoding: {}", result.csv_info.encoding);
    eprintln!("   Delimiter: '{}'", format_delimiter(result.csv_info.delimiter));
    eprintln!("   Rows: {}", result.csv_info.row_count);

    match result.outcome {
        Outcome::Invalid { errors } => {
            eprintln!("\n❌ {} problems, no spreadsheet generated:", errors.len());
            for err in &errors {
                eprintln!("   - {}", err);
            }
            write_error_report(errors_path, &errors)?;
            eprintln!("💾 Error report written to: {}", errors_path.display());
            std::process::exit(1);
        }
        Outcome::Generated { records } => {
            write_campaign_file(output, &records)?;
            eprintln!("\n⚙️  Generated {} records", records.len());
            eprintln!("💾 Spreadsheet written to: {}", output.display());

            if let Some(json_path) = json {
                let content = serde_json::to_string_pretty(&records_to_json(&records))?;
                fs::write(json_path, content)?;
                eprintln!("💾 JSON written to: {}", json_path.display());
            }
        }
    }

    eprintln!("\n✨ Done!");
    Ok(())
}

async fn cmd_serve(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ServerConfig::from_env();
    if let Some(port) = port {
        config.port = port;
    }
    campgen::server::start_server(config).await
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
