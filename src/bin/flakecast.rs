//! flakecast — inspect wire value conversions
//!
//! # Usage
//!
//! ```bash
//! # Decode a field as the driver would
//! flakecast decode timestamp_tz "1700000000.5 1500"
//!
//! # Resolve TIMESTAMP_LTZ in a given zone
//! flakecast decode timestamp_ltz 1700000000 --zone +09:00
//!
//! # Show how parameters are bound
//! flakecast encode 42 3.14159 "'text'" @2024-01-31 "[1, 2]"
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::*;
use flakecast::prelude::*;
use flakecast::{bind_parameters, decompose_epoch, encode, infer_tag};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flakecast")]
#[command(version)]
#[command(about = "Decode and encode warehouse wire values", long_about = None)]
#[command(after_help = "EXAMPLES:
    flakecast decode date 19782
    flakecast decode timestamp_tz '0 1380'
    flakecast decode text --null
    flakecast encode 42u -1.5 true @12:30:00 '{id: 7}'")]
struct Cli {
    /// Output format (overrides the config file)
    #[arg(short, long, value_enum, global = true)]
    format: Option<OutputFormat>,

    /// Config file path
    #[arg(short, long, global = true, env = "FLAKECAST_CONFIG")]
    config: Option<PathBuf>,

    /// Trace every conversion step
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode one field for a wire type tag
    Decode {
        /// Wire type tag, e.g. date, timestamp_tz (unknown tags decode as text)
        tag: String,

        /// Encoded field
        #[arg(required_unless_present = "null", allow_hyphen_values = true)]
        value: Option<String>,

        /// Decode an SQL NULL
        #[arg(long, conflicts_with = "value")]
        null: bool,

        /// Session zone for TIMESTAMP_LTZ (local, utc, +HH:MM, Europe/Paris)
        #[arg(short, long)]
        zone: Option<String>,
    },
    /// Infer tags and encode value literals for binding
    Encode {
        /// Value literals
        #[arg(required = true, allow_negative_numbers = true)]
        literals: Vec<String>,
    },
    /// Split an epoch string into seconds and nanoseconds
    Epoch {
        /// Epoch with optional fraction, e.g. 1000.123
        #[arg(allow_hyphen_values = true)]
        raw: String,
    },
    /// Show the wire type tags
    Tags,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("flakecast=trace")
    } else {
        EnvFilter::try_from_env("FLAKECAST_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref()).context("Failed to load config")?;
    let format = cli.format.unwrap_or(config.output.format);

    match &cli.command {
        Commands::Decode {
            tag,
            value,
            null,
            zone,
        } => {
            let decoder = match zone {
                Some(zone) => Decoder::new(zone.parse()?),
                None => config.decoder()?,
            };
            let field = if *null { None } else { value.as_deref() };
            decode_field(&decoder, &WireTypeTag::parse(tag), field, format)
        }
        Commands::Encode { literals } => encode_literals(literals, format),
        Commands::Epoch { raw } => {
            let (sec, nsec) = decompose_epoch(raw)?;
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::json!({ "seconds": sec, "nanoseconds": nsec }))
                }
                OutputFormat::Table => {
                    println!("{} {}", "Seconds:".dimmed(), sec.to_string().cyan());
                    println!("{} {}", "Nanos:  ".dimmed(), nsec.to_string().cyan());
                }
            }
            Ok(())
        }
        Commands::Tags => {
            show_tags();
            Ok(())
        }
    }
}

fn decode_field(
    decoder: &Decoder,
    tag: &WireTypeTag,
    field: Option<&str>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let value = decoder
        .decode(field, tag)
        .with_context(|| format!("Cannot decode {:?} as {}", field.unwrap_or("NULL"), tag))?;

    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "tag": tag,
                "kind": value.kind(),
                "value": value,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Table => {
            if let WireTypeTag::Other(label) = tag {
                println!(
                    "{}",
                    format!("⚠ Unknown tag '{}', decoded as text", label).yellow()
                );
            }
            println!("{} {}", "Tag:  ".dimmed(), tag.to_string().cyan());
            if *tag == WireTypeTag::TimestampLtz {
                println!("{} {}", "Zone: ".dimmed(), decoder.zone().to_string().cyan());
            }
            println!("{} {}", "Kind: ".dimmed(), value.kind().white());
            let shown = if value.is_null() {
                "NULL".dimmed().to_string()
            } else {
                value.to_string().green().bold().to_string()
            };
            println!("{} {}", "Value:".dimmed(), shown);
        }
    }
    Ok(())
}

fn encode_literals(literals: &[String], format: OutputFormat) -> anyhow::Result<()> {
    let values = literals
        .iter()
        .map(|l| parse_literal(l).with_context(|| format!("Bad literal {:?}", l)))
        .collect::<anyhow::Result<Vec<BindValue>>>()?;

    match format {
        OutputFormat::Json => {
            let params = bind_parameters(&values)?;
            println!("{}", serde_json::to_string_pretty(&params)?);
        }
        OutputFormat::Table => {
            let mut rows = Vec::with_capacity(values.len());
            for (i, (literal, value)) in literals.iter().zip(&values).enumerate() {
                let wire = encode(value)?.unwrap_or_else(|| "NULL".to_string());
                rows.push([
                    format!("${}", i + 1),
                    literal.clone(),
                    value.kind().to_string(),
                    infer_tag(value).to_string(),
                    wire,
                ]);
            }
            print_table(&["#", "Literal", "Kind", "Type", "Wire"], &rows);
        }
    }
    Ok(())
}

fn print_table<const N: usize>(header: &[&str; N], rows: &[[String; N]]) {
    let mut widths: [usize; N] = (*header).map(|h| h.chars().count());
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let head: Vec<String> = header
        .iter()
        .zip(widths)
        .map(|(h, w)| format!("{:w$}", h, w = w))
        .collect();
    println!("{}", head.join(" │ ").white().bold());

    let sep: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    println!("{}", sep.join("─┼─").dimmed());

    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(c, w)| format!("{:w$}", c, w = w))
            .collect();
        println!("{}", cells.join(" │ "));
    }
}

fn show_tags() {
    println!("{}", "Wire type tags".cyan().bold());
    println!();

    let tags = [
        (WireTypeTag::Fixed, "-42", "integer (scaled decimals stay text)"),
        (WireTypeTag::Boolean, "true", "boolean"),
        (WireTypeTag::Real, "1.5e3", "float"),
        (WireTypeTag::Text, "abc", "text"),
        (WireTypeTag::Date, "19782", "UTC midnight, days since epoch"),
        (WireTypeTag::Time, "45296.789", "time of day"),
        (WireTypeTag::TimestampNtz, "1700000000.5", "timestamp without zone"),
        (WireTypeTag::TimestampLtz, "1700000000.5", "timestamp in session zone"),
        (WireTypeTag::TimestampTz, "1700000000.5 1500", "timestamp, offset minutes + 1440"),
    ];

    println!(
        "{:15} {:20} {}",
        "Tag".white().bold(),
        "Example".white().bold(),
        "Decodes to".white().bold()
    );
    println!("{}", "─".repeat(72).dimmed());

    for (tag, example, decoded) in tags {
        println!(
            "{:15} {:20} {}",
            tag.to_string().cyan().bold(),
            example.yellow(),
            decoded.dimmed()
        );
    }
    println!();
    println!("{}", "Any other tag passes the field through as text.".dimmed());
}
