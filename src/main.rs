//! CLI entry point for the chapter simulator

use chapter_sim::{
    config::{EngineSettings, GameConfig},
    simulation::{simulate, simulate_profile, sweep_profiles},
    stats::{SimReport, SweepSummary},
};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Log,
}

#[derive(Parser, Debug)]
#[command(name = "chapter-sim")]
#[command(version)]
#[command(about = "Deterministic chapter and meta-progression simulator", long_about = None)]
struct Args {
    /// Path to the balance configuration file (YAML or JSON)
    #[arg(short, long)]
    config: PathBuf,

    /// Simulate this behavior profile instead of the one flagged simulate=TRUE
    #[arg(long, conflicts_with = "all_profiles")]
    profile: Option<String>,

    /// Simulate every behavior profile and print an aggregate
    #[arg(short, long, default_value = "false")]
    all_profiles: bool,

    /// Run profiles in parallel (with --all-profiles)
    #[arg(short, long, default_value = "false")]
    parallel: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Override the round ceiling from the config
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_rounds: Option<u32>,

    /// Override the per-battle round ceiling from the config
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_battle_rounds: Option<u32>,

    /// Show timing information
    #[arg(short, long, default_value = "false")]
    timing: bool,

    /// Print debug diagnostics to stderr
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    // Load config
    let config = match GameConfig::from_file(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let mut settings = config.engine_settings();
    if let Some(n) = args.max_rounds {
        settings.max_rounds = n;
    }
    if let Some(n) = args.max_battle_rounds {
        settings.max_battle_rounds = n;
    }

    if args.all_profiles {
        run_sweep(&args, &config, settings);
    } else {
        run_single(&args, &config, settings);
    }
}

fn run_single(args: &Args, config: &GameConfig, settings: EngineSettings) {
    let start = Instant::now();
    let result = match &args.profile {
        Some(name) => simulate_profile(config, name, settings),
        None => simulate(config, settings),
    };
    let elapsed = start.elapsed();

    let report = match result {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Simulation failed: {}", e);
            std::process::exit(1);
        }
    };

    match args.output {
        OutputFormat::Text => {
            print_report(&report, config.get_total_chapters());
            if args.timing {
                println!();
                println!("--- Performance ---");
                println!("Total time: {:.3}ms", elapsed.as_secs_f64() * 1000.0);
                println!("Log records: {}", report.log.len());
            }
        }
        OutputFormat::Json => print_json(&report),
        OutputFormat::Log => match report.log.to_json_lines() {
            Ok(lines) => print!("{}", lines),
            Err(e) => {
                eprintln!("Failed to serialize log: {}", e);
                std::process::exit(1);
            }
        },
    }
}

fn run_sweep(args: &Args, config: &GameConfig, settings: EngineSettings) {
    let start = Instant::now();
    let sweep = sweep_profiles(config, settings, args.parallel);
    let elapsed = start.elapsed();

    match args.output {
        OutputFormat::Text => {
            print_sweep(&sweep);
            if args.timing {
                let threads = if args.parallel { rayon::current_num_threads() } else { 1 };
                println!();
                println!("--- Performance ---");
                println!("Total time: {:.3}ms", elapsed.as_secs_f64() * 1000.0);
                println!("Threads: {} ({} cores available)", threads, num_cpus::get());
                println!(
                    "Per profile: {:.3}ms",
                    elapsed.as_secs_f64() * 1000.0 / sweep.profiles.len().max(1) as f64
                );
            }
        }
        OutputFormat::Json | OutputFormat::Log => print_json(&sweep),
    }

    if sweep.completed == 0 {
        std::process::exit(1);
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => {
            eprintln!("Failed to serialize results: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_report(report: &SimReport, total_chapters: u32) {
    let s = &report.summary;
    println!("=== Chapter Simulation Results ===");
    println!("Profile: {}", report.profile);
    println!();
    println!("Chapters cleared: {} / {}", s.chapters_cleared, total_chapters);
    println!("Rounds played: {} ({} defeats)", s.rounds_done, s.defeats);
    println!("Days elapsed: {}", s.days_elapsed);
    println!();
    println!("--- Attempts per chapter ---");
    for (chapter, attempts) in &s.attempts_per_chapter {
        println!("Chapter {:>3}: {}", chapter, attempts);
    }
    println!();
    println!("--- Combat ---");
    println!("Battles won: {}", s.battles_won);
    println!("Battles lost: {}", s.battles_lost);
    println!();
    println!("--- Economy ---");
    println!("Gold earned: {}", s.gold_earned);
    println!("Gold spent: {}", s.gold_spent);
    println!("Gold left: {}", s.final_gold);
    println!(
        "Meta levels: atk {} / def {} / max_hp {}",
        s.final_levels.atk, s.final_levels.def, s.final_levels.max_hp
    );
}

fn print_sweep(sweep: &SweepSummary) {
    println!("=== Profile Sweep Results ===");
    println!("Profiles: {} completed, {} failed", sweep.completed, sweep.failed);
    if sweep.completed > 0 {
        println!("Rounds: {} - {} (avg {:.2})", sweep.min_rounds, sweep.max_rounds, sweep.avg_rounds);
        println!("Avg days: {:.2}", sweep.avg_days);
    }
    println!();
    for row in &sweep.profiles {
        match (&row.summary, &row.error) {
            (Some(s), _) => println!(
                "{:<16} rounds {:>5}  days {:>5}  defeats {:>5}  levels {}",
                row.profile,
                s.rounds_done,
                s.days_elapsed,
                s.defeats,
                s.final_levels.total()
            ),
            (None, Some(e)) => println!("{:<16} FAILED: {}", row.profile, e),
            (None, None) => println!("{:<16} no result", row.profile),
        }
    }
}
