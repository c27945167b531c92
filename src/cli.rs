//! Command-line interface components.

use crate::config::{CompressionAlgorithm, ExportConfig, OutputFormat, ParserConfig};
use crate::experiments::ExperimentKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "explain")]
#[command(about = "Read Gamry EXPLAIN (.DTA) files and convert their curves to Parquet or CSV")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the header and curve layout of a DTA file
    Inspect(InspectArgs),
    /// Convert DTA curves to Parquet or CSV files
    Convert(ConvertArgs),
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// DTA file to inspect
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Also print notes and other multi-line header values
    #[arg(long)]
    pub full: bool,
}

#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// DTA files, directories (searched recursively) or glob patterns
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<String>,

    /// Output directory for converted curves
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Output format (parquet, csv)
    #[arg(long, default_value = "parquet")]
    pub format: OutputFormat,

    /// Parquet compression algorithm (snappy, zstd, lz4, none)
    #[arg(long, default_value = "snappy")]
    pub compression: CompressionAlgorithm,

    /// Column projection (auto, raw, impedance, vfp600)
    #[arg(short, long, default_value = "auto")]
    pub experiment: ExperimentKind,

    /// Convert the T column to absolute timestamps using header DATE/TIME
    #[arg(long)]
    pub timestamps: bool,

    /// Keep existing output files
    #[arg(long)]
    pub no_overwrite: bool,
}

impl ConvertArgs {
    pub fn parser_config(&self) -> ParserConfig {
        let config = ParserConfig::default();
        if self.timestamps {
            config.with_timestamps()
        } else {
            config
        }
    }

    pub fn export_config(&self) -> ExportConfig {
        let config = ExportConfig::default()
            .with_format(self.format)
            .with_compression(self.compression);
        if self.no_overwrite {
            config.without_overwrite()
        } else {
            config
        }
    }
}

impl Args {
    /// Log level implied by the verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

/// Command implementations
pub mod commands {
    use super::*;
    use crate::constants::DTA_EXTENSION;
    use crate::export::export_experiment;
    use crate::experiments::open_experiment;
    use crate::models::{ExportStats, HeaderValue};
    use crate::parser::{ExperimentParser, GamryParser};
    use anyhow::{Context, Result};
    use colored::*;
    use indicatif::{ProgressBar, ProgressStyle};
    use std::path::Path;
    use tracing::{debug, warn};

    /// Dispatch a parsed command line
    pub fn run(args: &Args) -> Result<()> {
        setup_logging(args)?;

        match &args.command {
            Commands::Inspect(inspect) => run_inspect(inspect),
            Commands::Convert(convert) => run_convert(convert).map(|_| ()),
        }
    }

    /// Set up structured logging based on CLI arguments
    fn setup_logging(args: &Args) -> Result<()> {
        use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

        let log_level = args.log_level();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("explain_processor={}", log_level)));

        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .context("Failed to initialise logging")?;

        debug!("Logging initialized at level: {}", log_level);
        Ok(())
    }

    fn run_inspect(args: &InspectArgs) -> Result<()> {
        let mut parser = GamryParser::new();
        parser
            .load_file(&args.file)
            .with_context(|| format!("Failed to load {}", args.file.display()))?;

        let header = parser.header()?;
        println!("{}", args.file.display().to_string().bright_green().bold());
        match header.experiment_type() {
            Some(kind) => println!("  {} {}", "Experiment:".bright_cyan(), kind),
            None => println!("  {} {}", "Experiment:".bright_cyan(), "unknown".bright_black()),
        }
        if let Ok(ts) = header.timestamp() {
            println!("  {} {}", "Started:".bright_cyan(), ts);
        }

        println!("\n{}", "Header".bright_yellow());
        for (key, value) in header.iter() {
            println!("  {:<16} {}", key, describe_value(value, args.full));
        }

        println!("\n{}", "Curves".bright_yellow());
        for index in 0..parser.curve_count()? {
            let curve = parser.table(index)?;
            println!(
                "  {} {} rows",
                format!("[{}]", index).bright_white().bold(),
                curve.row_count().to_string().bright_white()
            );
            let units = std::iter::once("").chain(curve.units.iter().map(String::as_str));
            for (key, unit) in curve.keys.iter().zip(units) {
                if unit.is_empty() {
                    println!("      {}", key);
                } else {
                    println!("      {} {}", key, format!("[{}]", unit).bright_black());
                }
            }
        }

        Ok(())
    }

    /// Header value as shown by `inspect`; multi-line text is summarised unless `full`
    fn describe_value(value: &HeaderValue, full: bool) -> String {
        if let Some(enabled) = value.as_bool() {
            return if enabled { "on" } else { "off" }.to_string();
        }

        let text = value.to_string();
        if text.contains('\n') && !full {
            format!("({} lines)", text.lines().count())
        } else {
            text
        }
    }

    /// Convert every input, counting per-file failures instead of aborting
    pub fn run_convert(args: &ConvertArgs) -> Result<ExportStats> {
        let files = collect_inputs(&args.inputs)?;
        if files.is_empty() {
            anyhow::bail!("No DTA files found in {:?}", args.inputs);
        }

        let parser_config = args.parser_config();
        let export_config = args.export_config();

        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .context("Invalid progress bar template")?
                .progress_chars("#>-"),
        );

        let mut stats = ExportStats::default();
        for file in &files {
            if let Some(name) = file.file_name() {
                pb.set_message(name.to_string_lossy().to_string());
            }

            let result = open_experiment(file, &parser_config, args.experiment).and_then(
                |experiment| {
                    export_experiment(&*experiment, file, &args.output_dir, &export_config)
                },
            );

            match result {
                Ok(file_stats) => stats.merge(file_stats),
                Err(e) => {
                    warn!("Failed to convert {}: {}", file.display(), e);
                    pb.println(format!("{} {}: {}", "Failed".bright_red(), file.display(), e));
                    stats.files_failed += 1;
                }
            }
            pb.inc(1);
        }
        pb.finish_with_message("done");

        println!("\n{}", "Conversion Summary".bright_green().bold());
        println!(
            "  {} {}",
            "Files converted:".bright_cyan(),
            stats.files_processed.to_string().bright_white()
        );
        if stats.files_failed > 0 {
            println!(
                "  {} {}",
                "Files failed:".bright_red(),
                stats.files_failed.to_string().bright_red().bold()
            );
        }
        println!(
            "  {} {}",
            "Curves written:".bright_cyan(),
            stats.curves_written.to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Total rows:".bright_cyan(),
            stats.total_rows.to_string().bright_white().bold()
        );

        Ok(stats)
    }

    /// Expand files, directories and glob patterns into a sorted file list
    pub fn collect_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for input in inputs {
            let path = Path::new(input);
            if path.is_file() {
                files.push(path.to_path_buf());
            } else if path.is_dir() {
                for entry in walkdir::WalkDir::new(path) {
                    let entry = entry.context("Failed to walk directory")?;
                    if entry.file_type().is_file() && is_dta(entry.path()) {
                        files.push(entry.into_path());
                    }
                }
            } else {
                let matches = glob::glob(input)
                    .with_context(|| format!("Invalid glob pattern: {}", input))?;
                for entry in matches {
                    let entry = entry.context("Failed to read glob match")?;
                    if entry.is_file() {
                        files.push(entry);
                    }
                }
            }
        }

        files.sort();
        files.dedup();
        debug!("Collected {} input files", files.len());
        Ok(files)
    }

    fn is_dta(path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(DTA_EXTENSION))
    }

}
