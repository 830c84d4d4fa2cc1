//! cacheable CLI
//!
//! Command-line driver for the cacheable TTL state tracker.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use serde_json::{json, Value};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cacheable_core::{to_datetime, CacheableConfig, Clock, ManualClock, Store, Timestamp, Ttl};
use cacheable_state::{CacheReport, Cacheable, Phase};

/// cacheable - volatile TTL cache state tracker
#[derive(Parser)]
#[command(name = "cacheable")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging, including the per-call debug line
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON config file with key/ttl/offset/verbose defaults
    #[arg(short, long, global = true, env = "CACHEABLE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Store settings that override the config file.
#[derive(Args, Debug, Default)]
struct StoreArgs {
    /// Store label used in log output
    #[arg(long)]
    key: Option<String>,
    /// Expiry window, e.g. "3h", "1s", "250ms"
    #[arg(long)]
    ttl: Option<Ttl>,
    /// Fraction of the window after which the store is stale
    #[arg(long)]
    offset: Option<f64>,
}

impl StoreArgs {
    fn apply(self, mut config: CacheableConfig) -> CacheableConfig {
        if let Some(key) = self.key {
            config.key = key;
        }
        if let Some(ttl) = self.ttl {
            config.ttl = ttl;
        }
        if let Some(offset) = self.offset {
            config.offset = offset;
        }
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Step a store through time on a simulated clock
    Simulate {
        #[command(flatten)]
        store: StoreArgs,
        /// Items pushed each time state() refreshes the store
        #[arg(short, long, default_value = "1")]
        items: usize,
        /// Simulated time between steps
        #[arg(long, default_value = "100ms")]
        step: Ttl,
        /// Number of steps
        #[arg(short = 'n', long, default_value = "12")]
        steps: usize,
    },

    /// Poll a store on the wall clock
    Watch {
        #[command(flatten)]
        store: StoreArgs,
        /// Items pushed each time state() refreshes the store
        #[arg(short, long, default_value = "1")]
        items: usize,
        /// Time between ticks
        #[arg(long, default_value = "250ms")]
        interval: Ttl,
        /// Number of ticks before exiting
        #[arg(short = 'n', long, default_value = "20")]
        ticks: usize,
    },

    /// Report the state of a JSON store without modifying it
    Inspect {
        /// Store file, or "-" to read stdin
        path: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "cacheable=debug,info"
    } else {
        "cacheable=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = load_config(cli.config.as_deref())?;
    config.verbose |= cli.verbose;

    match cli.command {
        Commands::Simulate {
            store,
            items,
            step,
            steps,
        } => cmd_simulate(settings(store, config)?, items, step, steps),
        Commands::Watch {
            store,
            items,
            interval,
            ticks,
        } => cmd_watch(settings(store, config)?, items, interval, ticks).await,
        Commands::Inspect { path, json } => cmd_inspect(&path, json),
    }
}

/// Loads the config file if one was given, otherwise the defaults.
fn load_config(path: Option<&Path>) -> Result<CacheableConfig> {
    match path {
        Some(path) => {
            let config = CacheableConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            info!(path = %path.display(), key = %config.key, ttl = %config.ttl, "Loaded config");
            Ok(config)
        }
        None => Ok(CacheableConfig::default()),
    }
}

/// Applies command-line overrides and validates the result.
fn settings(args: StoreArgs, config: CacheableConfig) -> Result<CacheableConfig> {
    let config = args.apply(config);
    config.validate().context("Invalid store settings")?;
    Ok(config)
}

/// One observation of the store, taken just before `state()` runs.
struct Tick {
    phase: Phase,
    refreshed: bool,
    report: CacheReport,
}

/// Observes the phase, runs `state()`, and refills the cache on refresh.
fn tick<C: Clock>(
    tracker: &mut Cacheable<'_, Value, C>,
    items: usize,
    next_item: &mut usize,
) -> Result<Tick> {
    let phase = tracker.phase();
    let refreshed = tracker.state();

    if refreshed {
        for _ in 0..items {
            tracker.fetch().push(json!({ "item": *next_item }))?;
            *next_item += 1;
        }
    }

    Ok(Tick {
        phase,
        refreshed,
        report: tracker.report(),
    })
}

fn paint(phase: Phase) -> ColoredString {
    let label = format!("{phase:<7}");
    match phase {
        Phase::Fresh => label.green(),
        Phase::Stale => label.yellow(),
        Phase::Expired => label.red().bold(),
    }
}

fn print_tick(label: &str, tick: &Tick) {
    let refreshed = if tick.refreshed {
        "refreshed".cyan()
    } else {
        "         ".normal()
    };
    println!(
        "   {:>12}  {}  {:>4}  {}  {}",
        label,
        paint(tick.phase),
        tick.report.cache_size,
        refreshed,
        tick.report.to_string().dimmed()
    );
}

fn print_settings(title: &str, config: &CacheableConfig) {
    println!(
        "{} key={} ttl={} offset={}",
        title.cyan().bold(),
        config.key,
        config.ttl,
        config.offset
    );
    println!(
        "   {:>12}  {:<7}  {:>4}  {:<9}  {}",
        "time".dimmed(),
        "phase".dimmed(),
        "size".dimmed(),
        "",
        "report".dimmed()
    );
}

fn format_time(ts: Timestamp) -> String {
    to_datetime(ts)
        .map(|dt| dt.format("%H:%M:%S%.3f").to_string())
        .unwrap_or_else(|| ts.to_string())
}

/// Deterministic run on a manual clock
fn cmd_simulate(config: CacheableConfig, items: usize, step: Ttl, steps: usize) -> Result<()> {
    print_settings("⏱  Simulating", &config);

    let clock = ManualClock::starting_now();
    let start = clock.now();
    let verbose = config.verbose;
    let mut store: Store = config.into_store();
    let mut tracker = Cacheable::with_clock(&mut store, clock.clone()).verbose(verbose);
    let mut next_item = 0;

    for _ in 0..=steps {
        let observed = tick(&mut tracker, items, &mut next_item)?;
        print_tick(&format!("+{}ms", clock.now() - start), &observed);
        clock.advance(step.as_millis());
    }

    Ok(())
}

/// Real-time polling loop
async fn cmd_watch(config: CacheableConfig, items: usize, interval: Ttl, ticks: usize) -> Result<()> {
    ensure!(interval.as_millis() > 0, "interval must be positive, got {interval}");
    print_settings("👀 Watching", &config);

    let verbose = config.verbose;
    let mut store: Store = config.into_store();
    let mut tracker = Cacheable::new(&mut store).verbose(verbose);
    let mut timer = tokio::time::interval(interval.as_duration());
    let mut next_item = 0;

    for _ in 0..ticks {
        timer.tick().await;
        let observed = tick(&mut tracker, items, &mut next_item)?;
        print_tick(&format_time(tracker.now()), &observed);
    }

    Ok(())
}

/// Read-only report on a serialized store
fn cmd_inspect(path: &Path, as_json: bool) -> Result<()> {
    let raw = read_input(path)?;
    let mut store: Store = serde_json::from_str(&raw).context("Failed to parse store JSON")?;
    let tracker = Cacheable::new(&mut store);
    let now = tracker.now();
    let report = tracker.report_at(now);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} {}", "🔍 Store:".cyan().bold(), report.key);
    println!("   {} {}", "Phase:".dimmed(), paint(report.phase()));
    println!("   {} {}", "Size:".dimmed(), report.cache_size);
    println!("   {} {}", "TTL:".dimmed(), tracker.store().ttl);
    if let Some(expires) = tracker.store().expires {
        println!("   {} {}", "Expires:".dimmed(), format_time(expires));
    }
    if let Some(stale) = tracker.store().stale {
        println!("   {} {}", "Stale:".dimmed(), format_time(stale));
    }
    println!("\n   {}", report.to_string().dimmed());

    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read store from stdin")?;
        Ok(raw)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read store file {}", path.display()))
    }
}
