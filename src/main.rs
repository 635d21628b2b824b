use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use lead_radar::config::Settings;
use lead_radar::geo::Coordinate;
use lead_radar::presentation::format_km;
use lead_radar::roster::{NearbySalesperson, Roster};
use lead_radar::{server, telemetry};

/// Lead Radar: find the nearest salesperson for a lead.
///
/// Examples:
///   lead-radar serve --roster roster.json
///   lead-radar serve --port 9000 --config ./config.json
///   lead-radar nearby --lat 28.6139 --lng 77.2090 --roster roster.json
///   lead-radar nearby --lat 19.0760 --lng 72.8777 --roster roster.json --available-only
#[derive(Parser)]
#[command(name = "lead-radar", version, about, long_about = None)]
struct Cli {
    /// Config file. Defaults to ~/.lead_radar/config.json.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Rank salespeople from a roster file by distance to a point.
    Nearby(NearbyArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Bind address (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port (overrides config).
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// JSON roster snapshot to load at startup (overrides config).
    #[arg(long)]
    roster: Option<PathBuf>,
}

#[derive(Args)]
struct NearbyArgs {
    /// Target latitude (-90 to 90).
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Target longitude (-180 to 180).
    #[arg(long, allow_hyphen_values = true)]
    lng: f64,

    /// JSON roster snapshot (overrides config).
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Only report the closest available salesperson.
    #[arg(long)]
    available_only: bool,
}

fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let settings = loaded.unwrap_or_else(|e| fail(e));
    telemetry::init(&settings.log_filter);

    match cli.command {
        Command::Serve(args) => serve(settings, args),
        Command::Nearby(args) => nearby(&settings, args),
    }
}

fn serve(mut settings: Settings, args: ServeArgs) {
    if let Some(host) = args.host {
        settings.host = host;
    }
    if let Some(port) = args.port {
        settings.port = port;
    }
    if args.roster.is_some() {
        settings.roster_path = args.roster;
    }

    let roster = match &settings.roster_path {
        Some(path) => Roster::load_from(path).unwrap_or_else(|e| fail(e)),
        None => {
            tracing::warn!("no roster file configured, starting with an empty roster");
            Roster::new()
        }
    };

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| fail(e));
    if let Err(e) = runtime.block_on(server::start(&settings, roster)) {
        fail(format!("server on {}: {}", settings.bind_addr(), e));
    }
}

fn nearby(settings: &Settings, args: NearbyArgs) {
    let target = Coordinate::checked(args.lat, args.lng).unwrap_or_else(|e| fail(e));

    let Some(path) = args.roster.as_ref().or(settings.roster_path.as_ref()) else {
        fail("no roster file. Use --roster or set roster_path in the config");
    };
    let roster = Roster::load_from(path).unwrap_or_else(|e| fail(e));

    let results: Vec<NearbySalesperson> = if args.available_only {
        roster.nearest_available(target).into_iter().collect()
    } else {
        roster.nearby(target)
    };

    // Table to stderr, JSON to stdout.
    eprintln!("  Target {}", target);
    if results.is_empty() {
        eprintln!("  No salesperson with a known location.");
    }
    for (i, sp) in results.iter().enumerate() {
        eprintln!(
            "  {:>2}. {:<24} {:>12}  [{}]",
            i + 1,
            sp.full_name,
            format_km(sp.distance_km),
            sp.status
        );
    }

    match serde_json::to_string_pretty(&results) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(e),
    }
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", msg);
    std::process::exit(1);
}
