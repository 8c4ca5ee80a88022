// src/main.rs

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use tckport::{
    CliProgress, Config, LogProgress, Pipeline, ProgressStyle, ProgressTracker, RunReport,
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "tckport")]
#[command(author, version, long_about = None)]
#[command(about = "Convert a TCK distribution into Maven modules")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Distribution zip to convert (download target when --url is given)
    #[arg(long, value_name = "FILE")]
    archive: Option<PathBuf>,

    /// URL to download the distribution from
    #[arg(long)]
    url: Option<String>,

    /// Directory the distribution is extracted into
    #[arg(long, value_name = "DIR")]
    work_dir: Option<PathBuf>,

    /// Directory web archives are collected into
    #[arg(long, value_name = "DIR")]
    deploy_dir: Option<PathBuf>,

    /// Root of the generated Maven project
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Replace existing resource and source files (POMs are always kept)
    #[arg(long)]
    overwrite: bool,

    /// Log every archive entry
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        shell: Shell,
    },
}

impl Cli {
    /// Defaults, then the config file, then flags
    fn to_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        let paths = &mut config.paths;
        if let Some(archive) = &self.archive {
            paths.archive = archive.clone();
        }
        if let Some(url) = &self.url {
            paths.url = Some(url.clone());
        }
        if let Some(dir) = &self.work_dir {
            paths.work_dir = dir.clone();
        }
        if let Some(dir) = &self.deploy_dir {
            paths.deploy_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            paths.output_dir = dir.clone();
        }
        if self.overwrite {
            config.run.overwrite = true;
        }
        Ok(config)
    }

    fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

fn print_summary(report: &RunReport) {
    if let Some(bytes) = report.downloaded {
        println!("Downloaded bytes:  {}", bytes);
    }
    println!("Extracted files:   {}", report.extracted_files);
    println!("Deployed archives: {}", report.deployed);
    println!("Collisions:        {}", report.collisions.len());
    println!("New module POMs:   {}", report.descriptors_written);
    println!("Modules:           {}", report.units.len());
    println!("Resources copied:  {}", report.resources());
    println!("Sources copied:    {}", report.sources());

    for (category, count) in report.error_counts() {
        println!("{:<19}{}", format!("{} errors:", category), count);
    }

    for collision in &report.collisions {
        println!(
            "  duplicate {} skipped: {}",
            collision.file_name,
            collision.skipped.display()
        );
    }
    for unit in report.failed_units() {
        println!("  {} failed:", unit.name);
        for err in &unit.errors {
            println!("    [{}] {}", err.category(), err);
        }
    }
    for err in &report.errors {
        println!("  [{}] {}", err.category(), err);
    }
}

fn run(cli: &Cli) -> Result<RunReport> {
    let config = cli.to_config()?;
    info!(
        "Converting {} into {}",
        config.paths.archive.display(),
        config.paths.output_dir.display()
    );

    let progress: Box<dyn ProgressTracker> = if io::stderr().is_terminal() && !cli.quiet {
        Box::new(CliProgress::new("Converting", 0, ProgressStyle::Bar))
    } else {
        Box::new(LogProgress::new("convert", 0, ProgressStyle::Bar))
    };

    Pipeline::new(config)
        .run(progress.as_ref())
        .context("Conversion aborted")
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        generate(*shell, &mut Cli::command(), "tckport", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_filter())),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(report) => {
            print_summary(&report);
            if report.has_failures() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
