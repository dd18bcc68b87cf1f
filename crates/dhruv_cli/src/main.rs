use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, Utc};
use clap::{Args, Parser, Subcommand};
use dhruv_dasha::dasha::{
    DashaLevel, PeriodNode, Timeline, active_path, compute_timeline, dasha_hierarchy,
    upcoming_transitions,
};
use dhruv_dasha::{DashaConfig, nakshatra_from_longitude};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dhruv", about = "Vimshottari dasha timeline CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct BirthArgs {
    /// Birth datetime with offset (RFC 3339, e.g. 1990-05-14T08:30:00+05:30)
    #[arg(long)]
    birth_date: String,
    /// Moon's sidereal longitude at birth, in degrees
    #[arg(long, allow_negative_numbers = true)]
    moon_lon: f64,
    /// Path to a TOML engine config (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Mahadasha timeline from birth
    Timeline {
        #[command(flatten)]
        birth: BirthArgs,
    },
    /// Active periods at one instant
    Active {
        #[command(flatten)]
        birth: BirthArgs,
        /// Query datetime (RFC 3339)
        #[arg(long)]
        at: String,
        /// Deepest level to resolve (1-6, default from config)
        #[arg(long)]
        max_level: Option<u8>,
    },
    /// Upcoming sandhi (transition) windows
    Sandhi {
        #[command(flatten)]
        birth: BirthArgs,
        /// Start of the scan (RFC 3339)
        #[arg(long)]
        from: String,
        /// Lookahead in days
        #[arg(long, default_value = "365")]
        days: i64,
    },
    /// Fully materialized levels below the timeline
    Hierarchy {
        #[command(flatten)]
        birth: BirthArgs,
        /// Number of levels (1-6, default 2)
        #[arg(long, default_value = "2")]
        max_level: u8,
    },
    /// Nakshatra and Vimshottari lord from sidereal longitude
    Nakshatra {
        /// Sidereal ecliptic longitude in degrees
        #[arg(allow_negative_numbers = true)]
        lon: f64,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Timeline { birth } => {
            let (_, timeline) = load_timeline(&birth);
            if birth.json {
                print_json(&timeline);
                return;
            }
            print_timeline_header(&timeline, &birth.birth_date);
            for period in &timeline.periods {
                print_period(period, 1);
            }
        }

        Commands::Active {
            birth,
            at,
            max_level,
        } => {
            let (config, timeline) = load_timeline(&birth);
            let query = parse_instant(&at).with_timezone(&Utc);
            let max_level = max_level.unwrap_or(config.max_level);
            let path = active_path(&timeline, query, max_level, &config.weights)
                .unwrap_or_else(|e| fail(e));
            if birth.json {
                print_json(&path);
                return;
            }
            if path.is_empty() {
                println!("{at} is outside the timeline");
                return;
            }
            println!("Active dasha at {at} for birth {}\n", birth.birth_date);
            for period in &path.periods {
                print_period(period, period.level.depth() as usize);
                println!(
                    "{}  {:.2}% elapsed",
                    "  ".repeat(period.level.depth() as usize),
                    period.progress_percent_at(query)
                );
            }
            let chain: Vec<_> = path.grahas().iter().map(|g| g.name()).collect();
            println!("\n{}", chain.join(" / "));
        }

        Commands::Sandhi { birth, from, days } => {
            let (config, timeline) = load_timeline(&birth);
            let from_utc = parse_instant(&from).with_timezone(&Utc);
            let windows = upcoming_transitions(&timeline, from_utc, days, &config)
                .unwrap_or_else(|e| fail(e));
            if birth.json {
                print_json(&windows);
                return;
            }
            println!(
                "Sandhi windows within {days} days of {from} (levels 1-{})\n",
                config.sandhi.depth
            );
            if windows.is_empty() {
                println!("  none");
            }
            for w in &windows {
                println!(
                    "  {} {} -> {} at {} (window {} .. {}, {:.2} days)",
                    w.level.name(),
                    w.from,
                    w.to,
                    w.transition.to_rfc3339(),
                    w.window_start.to_rfc3339(),
                    w.window_end.to_rfc3339(),
                    w.window_secs as f64 / 86_400.0,
                );
            }
        }

        Commands::Hierarchy { birth, max_level } => {
            let (config, timeline) = load_timeline(&birth);
            let hierarchy =
                dasha_hierarchy(&timeline, max_level, &config.weights).unwrap_or_else(|e| fail(e));
            if birth.json {
                print_json(&hierarchy);
                return;
            }
            println!(
                "Dasha Hierarchy for birth {} ({} levels)\n",
                birth.birth_date,
                hierarchy.levels.len()
            );
            for (lvl_idx, level) in hierarchy.levels.iter().enumerate() {
                let level_name = DashaLevel::from_u8(lvl_idx as u8 + 1)
                    .map(|l| l.name())
                    .unwrap_or("Unknown");
                println!(
                    "Level {} ({}) - {} periods:",
                    lvl_idx + 1,
                    level_name,
                    level.len()
                );
                let display_count = level.len().min(50);
                for period in &level[..display_count] {
                    print_period(period, lvl_idx + 1);
                }
                if level.len() > display_count {
                    println!("  ... and {} more periods", level.len() - display_count);
                }
                println!();
            }
        }

        Commands::Nakshatra { lon } => {
            let info = nakshatra_from_longitude(lon).unwrap_or_else(|e| fail(e));
            println!(
                "{} (index {}) - lord {} ({:.4} deg in nakshatra)",
                info.nakshatra.name(),
                info.nakshatra_index,
                info.lord,
                info.degrees_in_nakshatra
            );
        }
    }
}

fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("Error: {e}");
    std::process::exit(1);
}

fn parse_instant(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s)
        .unwrap_or_else(|e| fail(format!("invalid datetime '{s}' (expected RFC 3339): {e}")))
}

fn load_config(path: Option<&PathBuf>) -> DashaConfig {
    match path {
        Some(p) => DashaConfig::from_file(p).unwrap_or_else(|e| fail(e)),
        None => DashaConfig::default(),
    }
}

fn load_timeline(args: &BirthArgs) -> (DashaConfig, Timeline) {
    let config = load_config(args.config.as_ref());
    let birth = parse_instant(&args.birth_date);
    let timeline = compute_timeline(birth, args.moon_lon, &config).unwrap_or_else(|e| fail(e));
    info!(
        periods = timeline.periods.len(),
        config = ?args.config,
        "timeline ready"
    );
    (config, timeline)
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => fail(e),
    }
}

fn print_timeline_header(timeline: &Timeline, birth_date: &str) {
    println!("Vimshottari timeline for birth {birth_date}");
    if let Some(info) = &timeline.nakshatra {
        println!(
            "Moon in {} (lord {}), {:.4} deg in nakshatra",
            info.nakshatra.name(),
            info.lord,
            info.degrees_in_nakshatra
        );
    }
    println!(
        "Balance: {} {} years ({} elapsed)\n",
        timeline.balance.graha,
        timeline.balance.balance_years.round_dp(4),
        timeline.balance.elapsed_fraction.round_dp(6)
    );
}

fn print_period(period: &PeriodNode, indent: usize) {
    println!(
        "{}[{}] {} {} .. {} ({} days)",
        "  ".repeat(indent),
        period.order,
        period.graha,
        period.start.to_rfc3339(),
        period.end.to_rfc3339(),
        period.duration_days().round_dp(2),
    );
}
