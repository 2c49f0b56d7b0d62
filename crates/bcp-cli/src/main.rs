//! bcp - plots for Bayesian comparisons of two alternatives
//!
//! Reads posterior snapshots (JSON) and writes:
//! - ternary plots of the left / ROPE / right probabilities
//! - Student-t density plots, overlaying several posteriors
//! - an HTML sheet bundling both for a set of comparisons

use bcp_cli::input::{load_config, load_snapshot, load_snapshots, parse_unsupported_density};
use bcp_cli::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use bcp_cli::{CliError, ExitCode, Result};
use bcp_plot::{
    palette, tern, DensityFigure, LineStyle, ProbabilitySource, Rgba, SheetGenerator,
    UnsupportedDensity,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

/// Plot posteriors of Bayesian comparisons
#[derive(Parser)]
#[command(name = "bcp")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Plot configuration file (JSON)
    #[arg(long, global = true, env = "BCP_CONFIG")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log output format (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Omit timestamps from human-readable logs
    #[arg(long, global = true)]
    no_timestamps: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ternary plot of one snapshot
    Tern(TernArgs),

    /// Density plot of one or more snapshots on shared axes
    Dens(DensArgs),

    /// HTML sheet with every snapshot
    Sheet(SheetArgs),

    /// Configuration management
    Config(ConfigArgs),
}

// ============================================================================
// Command argument structs
// ============================================================================

#[derive(Args, Debug)]
struct TernArgs {
    /// Snapshot file
    snapshot: PathBuf,

    /// Output file (.svg or .png)
    #[arg(short, long)]
    output: PathBuf,

    /// Label of the left corner
    #[arg(long)]
    left: Option<String>,

    /// Label of the right corner
    #[arg(long)]
    right: Option<String>,

    /// Histogram bins per axis
    #[arg(long)]
    bins: Option<usize>,

    /// Points outside the density grid: hide or floor
    #[arg(long, value_parser = parse_unsupported_density)]
    unsupported_density: Option<UnsupportedDensity>,
}

#[derive(Args, Debug)]
struct DensArgs {
    /// Snapshot files, drawn in order
    #[arg(required = true)]
    snapshots: Vec<PathBuf>,

    /// Output file (.svg or .png)
    #[arg(short, long)]
    output: PathBuf,

    /// Legend label per snapshot (defaults to the snapshot name)
    #[arg(long)]
    label: Vec<String>,

    /// Line style per snapshot (-, --, :, -.)
    #[arg(long, allow_hyphen_values = true)]
    style: Vec<LineStyle>,

    /// Colour per snapshot (#rrggbb or a palette name)
    #[arg(long)]
    color: Vec<Rgba>,

    /// Omit the legend
    #[arg(long)]
    no_legend: bool,
}

#[derive(Args, Debug)]
struct SheetArgs {
    /// Snapshot files
    #[arg(required = true)]
    snapshots: Vec<PathBuf>,

    /// Output HTML file
    #[arg(short, long)]
    output: PathBuf,

    /// Page title
    #[arg(long)]
    title: Option<String>,

    /// Keep the HTML readable
    #[arg(long)]
    no_minify: bool,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the effective configuration as JSON
    Show,
}

fn main() {
    let cli = Cli::parse();

    let cli_level = if cli.global.quiet || cli.global.verbose > 0 {
        Some(LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet))
    } else {
        None
    };
    init_logging(
        &LogConfig::from_env(cli_level, cli.global.log_format)
            .with_timestamps(!cli.global.no_timestamps),
    );

    let outcome = match &cli.command {
        Commands::Tern(args) => run_tern(&cli.global, args),
        Commands::Dens(args) => run_dens(&cli.global, args),
        Commands::Sheet(args) => run_sheet(&cli.global, args),
        Commands::Config(args) => run_config(&cli.global, args),
    };

    let exit_code = match outcome {
        Ok(()) => ExitCode::Clean,
        Err(err) => {
            let code = err.exit_code();
            error!(code = %code, "{}", err);
            eprintln!("error: {}", err);
            code
        }
    };
    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_tern(global: &GlobalOpts, args: &TernArgs) -> Result<()> {
    let mut options = load_config(global.config.as_deref())?.ternary;
    if let Some(left) = &args.left {
        options.labels[0] = left.clone();
    }
    if let Some(right) = &args.right {
        options.labels[1] = right.clone();
    }
    if let Some(bins) = args.bins {
        options.bins = bins;
    }
    if let Some(policy) = args.unsupported_density {
        options.unsupported_density = policy;
    }

    let snapshot = load_snapshot(&args.snapshot)?;
    tern(&snapshot, &options)?.save(&args.output)?;
    info!(output = %args.output.display(), "ternary plot written");
    Ok(())
}

fn run_dens(global: &GlobalOpts, args: &DensArgs) -> Result<()> {
    let n = args.snapshots.len();
    for (flag, given) in [
        ("--label", args.label.len()),
        ("--style", args.style.len()),
        ("--color", args.color.len()),
    ] {
        if given != 0 && given != n {
            return Err(CliError::Args(format!(
                "{} given {} times for {} snapshots",
                flag, given, n
            )));
        }
    }

    let mut options = load_config(global.config.as_deref())?.density;
    if args.no_legend {
        options.legend = false;
    }

    let snapshots = load_snapshots(&args.snapshots)?;
    let mut figure = DensityFigure::new(options)?;
    for (i, snapshot) in snapshots.iter().enumerate() {
        let label = match args.label.get(i) {
            Some(label) => label.clone(),
            None => snapshot
                .name()
                .map(String::from)
                .unwrap_or_else(|| format!("posterior {}", i + 1)),
        };
        let style = args
            .style
            .get(i)
            .copied()
            .unwrap_or(LineStyle::CYCLE[i % LineStyle::CYCLE.len()]);
        let color = args
            .color
            .get(i)
            .copied()
            .unwrap_or(palette::CYCLE[i % palette::CYCLE.len()]);
        figure.add_posterior(snapshot, &label, style, color)?;
    }
    figure.figure().save(&args.output)?;
    info!(
        output = %args.output.display(),
        curves = snapshots.len(),
        "density plot written"
    );
    Ok(())
}

fn run_sheet(global: &GlobalOpts, args: &SheetArgs) -> Result<()> {
    let mut config = load_config(global.config.as_deref())?;
    if args.title.is_some() {
        config.sheet.title = args.title.clone();
    }
    if args.no_minify {
        config.sheet.no_minify = true;
    }

    let snapshots = load_snapshots(&args.snapshots)?;
    let html = SheetGenerator::new(config).generate(&snapshots)?;
    std::fs::write(&args.output, html).map_err(|e| CliError::Plot(e.into()))?;
    info!(output = %args.output.display(), "comparison sheet written");
    Ok(())
}

fn run_config(global: &GlobalOpts, args: &ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => {
            let config = load_config(global.config.as_deref())?;
            println!("{}", config.to_json()?);
        }
    }
    Ok(())
}
