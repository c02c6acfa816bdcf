//! Sieve CLI
//!
//! CLI tool for testing URL filter rules against crawler URLs.

mod filter;
mod rules;

use std::collections::BTreeSet;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

use clap::{ArgAction, Args, Parser, Subcommand};

use sieve_compiler::write_rules;
use sieve_core::{FilterEngine, RuleAction, RuleFlavor};

use filter::{run_filter, FilterOptions, OutputFormat};
use rules::{load_resolver, RuleSource};

#[derive(Parser)]
#[command(name = "sieve")]
#[command(about = "Regex URL filter for crawlers")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RuleArgs {
    /// Rule file (defaults to the built-in rules)
    #[arg(short, long, env = "SIEVE_RULES", value_name = "PATH")]
    rules: Option<PathBuf>,

    /// Pattern flavor: basic (match anywhere) or anchored (match whole URL)
    #[arg(long, default_value = "basic")]
    flavor: RuleFlavor,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter URLs read from stdin, one per line
    Filter {
        #[command(flatten)]
        rules: RuleArgs,

        /// Public suffix list used to derive domains
        #[arg(long, env = "SIEVE_SUFFIX_LIST", value_name = "PATH")]
        suffix_list: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Show which rule decided each URL
        #[arg(long)]
        explain: bool,
    },

    /// Validate a rule file
    Check {
        #[command(flatten)]
        rules: RuleArgs,
    },

    /// Print a rule file in canonical form
    Fmt {
        #[command(flatten)]
        rules: RuleArgs,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Filter {
            rules,
            suffix_list,
            format,
            explain,
        } => cmd_filter(rules, suffix_list, FilterOptions { format, explain }),
        Commands::Check { rules } => cmd_check(rules),
        Commands::Fmt { rules } => cmd_fmt(rules),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn cmd_filter(args: RuleArgs, suffix_list: Option<PathBuf>, opts: FilterOptions) -> Result<(), String> {
    let source = RuleSource::from_arg(args.rules);
    let rules = source.load(args.flavor)?;
    let resolver = load_resolver(suffix_list.as_deref())?;
    let engine = FilterEngine::with_resolver(rules, resolver);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let stats = run_filter(&engine, stdin.lock(), stdout.lock(), opts)
        .map_err(|e| format!("Failed to filter URLs: {}", e))?;

    log::info!("{} accepted, {} rejected", stats.accepted, stats.rejected);
    Ok(())
}

fn cmd_check(args: RuleArgs) -> Result<(), String> {
    let source = RuleSource::from_arg(args.rules);

    let text = source.read_text()?;
    let line_count = text.lines().count();

    let start = Instant::now();
    let rules = source.compile(&text, args.flavor)?;
    let load_time = start.elapsed();

    let accept = rules.iter().filter(|r| r.action == RuleAction::Accept).count();
    let scoped = rules.iter().filter(|r| r.scope.is_some()).count();
    let scopes: BTreeSet<&str> = rules.iter().filter_map(|r| r.scope.as_deref()).collect();

    println!("Rules '{}' are valid", source.name());
    println!("  Lines:    {}", line_count);
    println!("  Rules:    {} ({} accept, {} reject)", rules.len(), accept, rules.len() - accept);
    println!("  Scoped:   {} rules across {} hosts/domains", scoped, scopes.len());
    println!("  Flavor:   {}", args.flavor);
    println!("  Time:     {:.1}ms", load_time.as_secs_f64() * 1000.0);

    Ok(())
}

fn cmd_fmt(args: RuleArgs) -> Result<(), String> {
    let source = RuleSource::from_arg(args.rules);
    let rules = source.load(args.flavor)?;
    print!("{}", write_rules(&rules));
    Ok(())
}
