//! modelgen — Go models from a MySQL schema
//!
//! # Usage
//!
//! ```bash
//! # Generate every table of `shop` into ./model/model.go
//! modelgen --database-url 'root:root@tcp(localhost:3306)/shop' -s shop -p model -o ./model
//!
//! # One file per table, with gorm column tags
//! modelgen -s shop -p model -o ./model --multi-file --tags 'gorm:"column:${columnName}"'
//!
//! # Look at what would be generated from
//! modelgen inspect -s shop --format json
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use modelgen::prelude::*;
use modelgen::schema;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "modelgen")]
#[command(version)]
#[command(about = "Generate Go model structs from a MySQL schema", long_about = None)]
#[command(after_help = "EXAMPLES:
    modelgen -s shop -p model -o ./model
    modelgen -s shop -p model -o ./model -t user,order_item --multi-file
    modelgen -s shop -p model -o ./model --tags 'gorm:\"column:${columnName}\"'
    modelgen inspect -s shop --format json
    modelgen types --type json=string")]
struct Cli {
    /// Database connection URL or Go-style DSN
    #[arg(long, env = "MODELGEN_DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Schema (database) to read
    #[arg(short, long, global = true)]
    schema: Option<String>,

    /// Package name of the generated files
    #[arg(short, long, global = true)]
    package: Option<String>,

    /// Existing output directory
    #[arg(short, long, global = true)]
    out: Option<PathBuf>,

    /// Only generate these tables
    #[arg(short = 't', long = "table", value_delimiter = ',', global = true)]
    tables: Vec<String>,

    /// Extra tag template; ${columnName} is replaced by the column name
    #[arg(long, global = true)]
    tags: Option<String>,

    /// Don't emit json tags
    #[arg(long, global = true)]
    no_json_tag: bool,

    /// Write one file per table instead of model.go
    #[arg(long, global = true)]
    multi_file: bool,

    /// Keep table and column names as they are in the database
    #[arg(long, global = true)]
    keep_names: bool,

    /// Don't run gofmt on the generated files
    #[arg(long, global = true)]
    no_format: bool,

    /// Append column comments to fields
    #[arg(long, global = true)]
    comments: bool,

    /// Extra type mapping, e.g. --type json=string
    #[arg(long = "type", value_name = "SRC=DST", value_parser = parse_type_override, global = true)]
    types: Vec<(String, String)>,

    /// Config file (default: ./modelgen.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print the generated files instead of writing them
    #[arg(long, global = true)]
    dry_run: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate model files (the default)
    Generate,
    /// Read the schema and print its columns
    Inspect {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Show the type mapping table
    Types,
}

impl Cli {
    /// Settings given on the command line, as a config overlay.
    fn overrides(&self) -> FileConfig {
        FileConfig {
            database_url: self.database_url.clone(),
            schema: self.schema.clone(),
            package: self.package.clone(),
            output: self.out.clone(),
            tables: (!self.tables.is_empty()).then(|| self.tables.clone()),
            json_tag: self.no_json_tag.then_some(false),
            tags: self.tags.clone(),
            single_file: self.multi_file.then_some(false),
            convert_case: self.keep_names.then_some(false),
            comments: self.comments.then_some(true),
            format: self.no_format.then_some(false),
            formatter: None,
            types: self.types.iter().cloned().collect(),
        }
    }
}

fn parse_type_override(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((src, dst)) if !src.is_empty() && !dst.is_empty() => {
            Ok((src.to_string(), dst.to_string()))
        }
        _ => Err(format!("expected SRC=DST, got '{}'", value)),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "modelgen=debug" } else { "modelgen=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: &Cli) -> Result<()> {
    let settings = FileConfig::discover(cli.config.as_deref())?.merge(cli.overrides());

    match &cli.command {
        Some(Commands::Types) => show_types(&settings.type_map()),
        Some(Commands::Inspect { format }) => inspect(&settings, format).await?,
        Some(Commands::Generate) | None => generate(settings, cli.dry_run).await?,
    }
    Ok(())
}

const NO_TABLES: &str = "(no tables matched)";

async fn generate(mut settings: FileConfig, dry_run: bool) -> Result<()> {
    if dry_run && settings.output.is_none() {
        settings.output = Some(PathBuf::from("."));
    }
    let generator = settings.builder()?.build()?;

    if dry_run {
        let group = generator.read_schema().await?;
        let files = generator.render(&group);
        if files.is_empty() {
            println!("{}", NO_TABLES.dimmed());
        }
        for file in files {
            println!("{} {}", "──".dimmed(), file.file_name.cyan().bold());
            print!("{}", file.contents);
        }
        return Ok(());
    }

    let written = generator.generate().await?;
    if written.is_empty() {
        println!("{}", NO_TABLES.dimmed());
        return Ok(());
    }
    for file in &written {
        let note = if file.formatted { "" } else { ", unformatted" };
        println!(
            "{} {} ({} bytes{})",
            "✓".green(),
            file.path.display().to_string().cyan(),
            file.bytes,
            note.yellow()
        );
    }
    Ok(())
}

async fn inspect(settings: &FileConfig, format: &OutputFormat) -> Result<()> {
    let url = settings
        .database_url
        .as_deref()
        .ok_or_else(|| anyhow!("no database URL. Use --database-url or set MODELGEN_DATABASE_URL"))?;
    let schema_name = settings
        .schema
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow!("no schema. Use --schema"))?;
    let tables = settings.tables.clone().unwrap_or_default();

    let group = schema::read_schema(url, schema_name, &tables, &settings.type_map()).await?;
    format_output(&group, format)
}

fn format_output(group: &TableGroup, format: &OutputFormat) -> Result<()> {
    if group.is_empty() {
        println!("{}", "(no tables)".dimmed());
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(group)?);
        }
        OutputFormat::Table => {
            let headers = ["table", "column", "type", "comment"];
            let rows: Vec<[&str; 4]> = group
                .iter()
                .flat_map(|t| &t.columns)
                .map(|c| {
                    [
                        c.table_name.as_str(),
                        c.column_name.as_str(),
                        c.data_type.as_str(),
                        c.comment.as_str(),
                    ]
                })
                .collect();

            // Column widths
            let mut widths: HashMap<usize, usize> =
                headers.iter().enumerate().map(|(i, h)| (i, h.len())).collect();
            for row in &rows {
                for (i, cell) in row.iter().enumerate() {
                    if let Some(w) = widths.get_mut(&i) {
                        *w = (*w).max(cell.chars().count());
                    }
                }
            }

            let header: Vec<String> = headers
                .iter()
                .enumerate()
                .map(|(i, h)| format!("{:width$}", h, width = widths[&i]))
                .collect();
            println!("{}", header.join(" │ ").white().bold());

            let sep: Vec<String> = (0..headers.len()).map(|i| "─".repeat(widths[&i])).collect();
            println!("{}", sep.join("─┼─").dimmed());

            for row in &rows {
                let cells: Vec<String> = row
                    .iter()
                    .enumerate()
                    .map(|(i, cell)| format!("{:width$}", cell, width = widths[&i]))
                    .collect();
                println!("{}", cells.join(" │ "));
            }

            println!();
            println!(
                "{} table(s), {} column(s)",
                group.len().to_string().cyan(),
                group.column_count().to_string().cyan()
            );
        }
    }
    Ok(())
}

fn show_types(types: &TypeMap) {
    println!("{}", "modelgen type mapping".cyan().bold());
    println!();
    println!("{:12} {}", "MySQL".white().bold(), "Go".white().bold());
    println!("{}", "─".repeat(30).dimmed());

    for (src, dst) in types.iter() {
        println!("{:12} {}", src.yellow(), dst.white());
    }

    println!();
    println!("{}", "Unlisted types are copied into the model unchanged.".dimmed());
}
