//! AST Compatibility Layer Driver
//!
//! Loads serialized translation units, or builds the sample ones, and runs
//! the checks built on the normalization layer over them.

mod checks;
mod report;

use anyhow::{anyhow, Context, Result};
use astcompat_ast::samples::{self, SAMPLE_NAMES};
use astcompat_ast::TranslationUnit;
use astcompat_common::{LangOptions, LangStandard};
use astcompat_core::schema::LATEST;
use astcompat_core::ACTIVE;
use checks::{run_checks, Check};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use report::Report;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "astcompat")]
#[command(about = "Normalize elaborated ASTs across host schema revisions")]
#[command(version = "0.1.0")]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Run checks over a translation unit serialized as JSON
    Check {
        /// Input translation unit
        input: PathBuf,

        /// Which checks to run
        #[arg(short, long, value_enum, default_value = "all")]
        check: Check,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,

        /// Override the language standard recorded in the unit
        #[arg(long = "std")]
        standard: Option<String>,
    },

    /// Run every check over built-in sample units
    Demo {
        /// Sample to run; all samples when omitted
        #[arg(short, long)]
        name: Option<String>,

        /// Write the sample unit as JSON (requires --name)
        #[arg(long)]
        emit_json: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Print the host schema revision this build targets
    Schema,
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::init();
    }

    let result = match cli.command {
        Commands::Check {
            input,
            check,
            format,
            standard,
        } => check_command(&input, check, format, standard.as_deref()),
        Commands::Demo {
            name,
            emit_json,
            format,
        } => demo_command(name.as_deref(), emit_json.as_deref(), format),
        Commands::Schema => {
            println!("{}", schema_description());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn schema_description() -> String {
    if ACTIVE == LATEST {
        format!("host schema {}", ACTIVE)
    } else {
        format!("host schema {} (pinned, latest is {})", ACTIVE, LATEST)
    }
}

fn load_unit(path: &Path, standard: Option<&str>) -> Result<TranslationUnit> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut unit = TranslationUnit::from_json(&json)
        .with_context(|| format!("failed to load {}", path.display()))?;
    if let Some(standard) = standard {
        let standard: LangStandard = standard.parse()?;
        info!("overriding language standard with {}", standard);
        unit.lang_options = LangOptions::for_standard(standard);
    }
    Ok(unit)
}

fn render(report: &Report, format: Format) -> Result<String> {
    Ok(match format {
        Format::Text => report.render_text(),
        Format::Json => report.to_json()?,
    })
}

fn check_command(input: &Path, check: Check, format: Format, standard: Option<&str>) -> Result<()> {
    let unit = load_unit(input, standard)?;
    let name = input.display().to_string();
    let report = run_checks(&unit, &name, check)?;
    println!("{}", render(&report, format)?);
    Ok(())
}

fn demo_command(name: Option<&str>, emit_json: Option<&Path>, format: Format) -> Result<()> {
    let selected = match name {
        Some(name) => {
            let sample = samples::sample(name).ok_or_else(|| {
                anyhow!("unknown sample '{}', expected one of: {}", name, SAMPLE_NAMES.join(", "))
            })?;
            vec![sample]
        }
        None => {
            if emit_json.is_some() {
                return Err(anyhow!("--emit-json needs a single sample, pass --name"));
            }
            samples::all_samples()
        }
    };

    for sample in &selected {
        info!("running sample {}: {}", sample.name, sample.description);
        let report = run_checks(&sample.unit, sample.name, Check::All)?;
        println!("{}", render(&report, format)?);
    }

    if let (Some(path), [sample]) = (emit_json, selected.as_slice()) {
        fs::write(path, sample.unit.to_json()?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Translation unit written to: {}", path.display());
    }
    Ok(())
}
