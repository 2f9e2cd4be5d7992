use std::path::PathBuf;
use anyhow::{bail, Context, Result};
use clap::Parser;
use json2sheet::config::ReportConfig;
use json2sheet::fields::discover;
use json2sheet::input::read_records;
use json2sheet::output::{write_report, JsonLayout, OutputFormat, WriteOptions};
use json2sheet::row::DEFAULT_LIST_SEPARATOR;
use json2sheet::{Report, ReportGenerator, SiblingMode};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Flatten nested JSON records (array, single object or JSON Lines) into a
/// deduplicated CSV, JSON or XLSX table.
#[derive(Parser, Debug)]
#[command(author, version, about = "Flatten nested JSON into spreadsheet rows", long_about = None)]
struct Cli {
    input: PathBuf,
    output: PathBuf,

    /// Config file: a JSON list of field paths or a full config object
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Comma-separated field paths (overrides the config file); without any, the leaf
    /// paths found in the input are used
    #[arg(long, value_delimiter = ',')]
    fields: Option<Vec<String>>,

    /// Field whose value identifies a record's rows (default: first field)
    #[arg(long)]
    group_key: Option<String>,

    /// Output format (default: from the output file extension)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Worksheet name for xlsx output
    #[arg(long)]
    sheet: Option<String>,

    /// Pair sibling arrays by position instead of combining every element
    #[arg(long)]
    zip_siblings: bool,

    /// Separator for lists of scalar values
    #[arg(long)]
    separator: Option<String>,

    /// Rebuild nested objects from dotted field paths in json output
    #[arg(long)]
    nested_json: bool,

    /// Input already holds flattened row objects; only lay them out in the output format
    #[arg(long)]
    from_rows: bool,

    /// Log per-record row counts
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<ReportConfig> {
    let mut config = match &cli.config {
        Some(path) => ReportConfig::load(path)
            .with_context(|| format!("Cannot read config file: {}", path.display()))?,
        None => ReportConfig::from_fields(Vec::new()),
    };
    if let Some(fields) = &cli.fields {
        config.fields = fields.iter().map(|f| f.trim().to_string()).collect();
    }
    if let Some(key) = &cli.group_key {
        config.group_key = Some(key.clone());
    }
    if let Some(sheet) = &cli.sheet {
        config.worksheet_name = Some(sheet.clone());
    }
    if cli.zip_siblings {
        config.sibling_mode = SiblingMode::Zip;
    }
    if let Some(separator) = &cli.separator {
        config.list_separator = Some(separator.clone());
    }
    Ok(config)
}

fn main() -> Result<()> {
    // Parse CLI flags
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = load_config(&cli)?;
    let format = match cli.format.or_else(|| OutputFormat::from_path(&cli.output)) {
        Some(format) => format,
        None => bail!(
            "Cannot tell the output format of {}; use --format",
            cli.output.display()
        ),
    };

    let records = read_records(&cli.input)
        .with_context(|| format!("Cannot read input file: {}", cli.input.display()))?;

    let report = if cli.from_rows {
        let separator = config.list_separator.as_deref().unwrap_or(DEFAULT_LIST_SEPARATOR);
        Report::from_flat_rows(&records, separator)
            .with_context(|| format!("Cannot read rows from {}", cli.input.display()))?
    } else {
        if config.fields.is_empty() {
            config.fields = discover(&records)
                .context("No fields configured and none found in the input")?
                .header();
            info!(fields = config.fields.len(), "using fields found in the input");
        }
        let generator = ReportGenerator::new(
            config.field_config()?,
            config.group_key()?,
            config.generate_options(),
        )?;
        generator.generate(&records)?
    };

    let options = WriteOptions {
        worksheet_name: config.worksheet_name().to_string(),
        json_layout: if cli.nested_json { JsonLayout::Nested } else { JsonLayout::Flat },
    };
    write_report(&report, &cli.output, format, &options)
        .with_context(|| format!("Cannot write output file: {}", cli.output.display()))?;

    println!(
        "Converted {} records from {} into {} rows in {}.",
        report.stats.records,
        cli.input.display(),
        report.rows.len(),
        cli.output.display()
    );
    Ok(())
}
