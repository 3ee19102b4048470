use std::path::PathBuf;

use anyhow::Context;
use bazi_core::{
    BaziError, BirthInfo, EngineConfig, FourPillars, Language, Pillar, Report, SexagenaryCalendar,
};
use clap::{Args, Parser, Subcommand};

/// Four Pillars chart analysis.
#[derive(Debug, Parser)]
#[command(name = "bazi", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Render the report in `zh` or `en` instead of canonical JSON.
    #[arg(long, global = true)]
    lang: Option<Language>,

    /// TOML file to load instead of `./bazi.toml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output (overridden by BAZI_LOG).
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a birth moment into pillars and analyse them.
    Analyze(AnalyzeArgs),
    /// Analyse four known pillars, e.g. `bazi pillars 己卯 丙子 戊午 戊午`.
    Pillars(PillarsArgs),
}

#[derive(Debug, Args)]
struct AnalyzeArgs {
    /// Birth date, YYYY-MM-DD.
    #[arg(long)]
    birth: String,
    /// Local birth time, HH:MM.
    #[arg(long)]
    time: String,
    /// IANA timezone of the birth place.
    #[arg(long)]
    tz: String,
    #[arg(long, default_value = "")]
    gender: String,
}

#[derive(Debug, Args)]
struct PillarsArgs {
    year: String,
    month: String,
    day: String,
    hour: String,
    #[arg(long)]
    gender: Option<String>,
}

fn main() {
    if let Err(error) = run() {
        eprintln!("bazi error: {error:#}");
        let client = error
            .downcast_ref::<BaziError>()
            .is_some_and(BaziError::is_client_error);
        std::process::exit(if client { 2 } else { 1 });
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = match &cli.config {
        Some(path) => EngineConfig::load_from(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => EngineConfig::load().context("failed to load configuration")?,
    };

    let report = match &cli.command {
        Commands::Analyze(args) => {
            let birth = BirthInfo::parse(&args.birth, &args.time, &args.tz, &args.gender)?;
            let calendar = SexagenaryCalendar::from_config(&config.calendar)?;
            Report::calculate(&birth, &calendar, &config)?
        }
        Commands::Pillars(args) => {
            let pillars = FourPillars::new(
                args.year.parse::<Pillar>()?,
                args.month.parse::<Pillar>()?,
                args.day.parse::<Pillar>()?,
                args.hour.parse::<Pillar>()?,
            );
            Report::from_pillars(&pillars, args.gender.as_deref(), &config)
        }
    };

    let json = match cli.lang {
        Some(language) => serde_json::to_string_pretty(&report.localize(language))?,
        None => serde_json::to_string_pretty(&report)?,
    };
    println!("{json}");
    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("BAZI_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
