use aggfn_lang::cli::{self, CheckOptions, CliError, RunOptions};
use aggfn_lang::{EngineConfig, ExtremumSeed};
use clap::{Parser as ClapParser, Subcommand};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "aggfn")]
#[command(about = "aggfn - stateful aggregation formulas over streaming samples")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a formula and show its signature
    Check {
        /// The formula to validate
        formula: String,
    },

    /// Evaluate a formula over newline-delimited JSON samples
    Run {
        /// The formula to evaluate
        formula: String,

        /// Samples, one JSON value per line (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Bind a fixed operand, e.g. --operand load=0.5
        #[arg(short, long = "operand")]
        operands: Vec<String>,

        /// Lines are {"sample": .., "operands": {..}} envelopes
        #[arg(long)]
        with_operands: bool,

        /// Pretty-print each result
        #[arg(short, long)]
        pretty: bool,

        /// Number of recent samples a percentile estimate keeps
        #[arg(long, default_value_t = aggfn_lang::config::DEFAULT_PERCENTILE_WINDOW)]
        percentile_window: usize,

        /// Seed max()/min() with -inf/+inf instead of the legacy seeds
        #[arg(long)]
        strict_seed: bool,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'aggfn docs' to list categories)
        category: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { formula } => run_check(formula),
        Commands::Run {
            formula,
            input,
            operands,
            with_operands,
            pretty,
            percentile_window,
            strict_seed,
        } => {
            let seed = if strict_seed {
                ExtremumSeed::Infinite
            } else {
                ExtremumSeed::Legacy
            };
            let config = EngineConfig::new()
                .with_percentile_window(percentile_window)
                .with_extremum_seed(seed);
            run_formula(formula, input, operands, with_operands, pretty, config)
        }
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| {
            print!("{}", content);
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_check(formula: String) -> Result<(), CliError> {
    let report = cli::execute_check(&CheckOptions { formula })?;
    println!("{}", report);
    Ok(())
}

fn run_formula(
    formula: String,
    input: Option<String>,
    operands: Vec<String>,
    with_operands: bool,
    pretty: bool,
    config: EngineConfig,
) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let options = RunOptions {
        formula,
        input,
        operands,
        with_operands,
        config,
    };

    for result in cli::execute_run(&options)? {
        let json = if pretty {
            serde_json::to_string_pretty(&result)?
        } else {
            serde_json::to_string(&result)?
        };
        println!("{}", json);
    }
    Ok(())
}
