use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use wootools_core::{
    status_message, UpdateEmitter, UpdateProcessor, UpdateSet, WootoolsConfig, WootoolsError,
};

#[derive(Parser)]
#[command(name = "wootools")]
#[command(about = "Write WooCommerce import files that correct product exports")]
#[command(arg_required_else_help = true)]
struct Args {
    /// Path to custom config file (YAML format)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Log more detail to stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Give every product a category and drop "Uncategorized" where others exist
    FixCategories {
        /// WooCommerce product export
        export: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Move regular prices onto the allowed pence endings
    RoundPrices {
        /// WooCommerce product export
        export: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Append the age-restriction disclaimer to knife descriptions
    AddDisclaimers {
        /// WooCommerce product export
        export: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Set shipping classes from Cloud Commerce package settings
    SetShippingClasses {
        /// WooCommerce product export
        #[arg(short, long)]
        woo_export: PathBuf,

        /// Cloud Commerce product export
        #[arg(short = 'i', long)]
        cc_export: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the effective configuration as YAML and exit
    ShowConfig,
}

#[derive(clap::Args)]
struct OutputArgs {
    /// Write the import CSV here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        report(&e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let processor = UpdateProcessor::new(config);

    let (updates, output) = match &args.command {
        Command::FixCategories { export, output } => {
            check_input(export)?;
            (processor.fix_categories(export)?, output)
        }
        Command::RoundPrices { export, output } => {
            check_input(export)?;
            (processor.round_prices(export)?, output)
        }
        Command::AddDisclaimers { export, output } => {
            check_input(export)?;
            (processor.add_disclaimers(export)?, output)
        }
        Command::SetShippingClasses {
            woo_export,
            cc_export,
            output,
        } => {
            check_input(woo_export)?;
            check_input(cc_export)?;
            (processor.set_shipping_classes(woo_export, cc_export)?, output)
        }
        Command::ShowConfig => {
            print!("{}", processor.config().to_yaml()?);
            return Ok(());
        }
    };

    for (rule, elapsed) in processor.rule_timings() {
        log::info!("{rule} finished in {:.0}ms", elapsed.as_millis());
    }

    write_updates(&updates, output.output.as_deref())?;
    eprintln!("{}", status_message(&updates));
    Ok(())
}

/// An explicit `--config` must load. Otherwise the per-user config file is
/// used when present, and the built-in defaults when not.
fn load_config(path: Option<&str>) -> Result<WootoolsConfig> {
    if let Some(path) = path {
        let config = WootoolsConfig::load_from_file(path)?;
        log::info!("Loaded config from: {path}");
        return Ok(config);
    }

    let user_config = dirs::config_dir().map(|dir| dir.join("wootools").join("config.yaml"));
    match user_config {
        Some(path) if path.is_file() => {
            let path = path.to_string_lossy().into_owned();
            log::info!("Loading config from: {path}");
            Ok(WootoolsConfig::load_with_fallback(Some(path.as_str())))
        }
        _ => {
            log::info!("Using default config");
            Ok(WootoolsConfig::default())
        }
    }
}

fn check_input(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    if !path.is_file() {
        anyhow::bail!("Input is not a file: {}", path.display());
    }
    Ok(())
}

fn write_updates(updates: &UpdateSet, output: Option<&Path>) -> Result<()> {
    if updates.is_empty() {
        return Ok(());
    }
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            let mut emitter = UpdateEmitter::new(BufWriter::new(file));
            emitter.emit(updates)?;
            emitter.into_inner().flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut emitter = UpdateEmitter::new(stdout.lock());
            emitter.emit(updates)?;
        }
    }
    Ok(())
}

/// Print a failed run to stderr, one line per offending record.
fn report(error: &anyhow::Error) {
    match error.downcast_ref::<WootoolsError>() {
        Some(WootoolsError::RuleFailures { rule, failures }) => {
            eprintln!("{rule} aborted, no import file written:");
            for failure in failures {
                eprintln!("{}", failure.error);
            }
        }
        _ => eprintln!("Error: {error:#}"),
    }
}
