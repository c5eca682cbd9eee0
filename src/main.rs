//! Minion interpreter
//!
//! Runs `.mns` programs and inspects their tokens.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::thread;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, LevelFilter};

use minion::feedback::{CheckFeedback, ErrorReport};
use minion::frontend::stats::LexicalStats;
use minion::{parse_program, tokenize, ConsoleEnvironment, ConsoleOptions, Evaluator};

/// Native stack for the interpreter thread
const RUN_STACK_SIZE: usize = 512 * 1024 * 1024;

/// Call depth allowed on the interpreter thread
const MAX_CALL_DEPTH: usize = 10_000;

/// Minion interpreter
#[derive(Parser, Debug)]
#[command(name = "minion")]
#[command(version)]
#[command(about = "Minion - a tree-walking interpreter for a language spoken in banana")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Program to run (.mns)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Print reports, tokens and statistics as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Fractional digits shown for printed values
    #[arg(long, global = true, default_value_t = 5)]
    precision: u32,

    /// Print bare values without the "Result: " prefix
    #[arg(long, global = true)]
    plain: bool,

    /// Log interpreter phases (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a program
    Run {
        /// Program file
        input: PathBuf,
    },
    /// Parse a program without running it
    Check {
        /// Program file
        input: PathBuf,
    },
    /// Print the token stream of a file
    Tokens {
        /// Program file
        input: PathBuf,
    },
    /// Print lexical statistics of a file
    Stats {
        /// Program file
        input: PathBuf,
    },
    /// Print version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Some(Commands::Run { input }) => run_file(input, &cli),
        Some(Commands::Check { input }) => check_file(input, &cli),
        Some(Commands::Tokens { input }) => print_tokens(input, &cli),
        Some(Commands::Stats { input }) => print_stats(input, &cli),
        Some(Commands::Version) => {
            println!("minion {}", env!("CARGO_PKG_VERSION"));
            println!("Minion interpreter");
            println!("License: {}", env!("CARGO_PKG_LICENSE"));
            Ok(true)
        }
        None => match &cli.input {
            Some(input) => run_file(input, &cli),
            None => {
                eprintln!("Error: No input file specified");
                eprintln!("Usage: minion <FILE> or minion run <FILE>");
                Ok(false)
            }
        },
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn read_source(input: &Path) -> Result<String> {
    fs::read_to_string(input).with_context(|| format!("could not read {}", input.display()))
}

/// Print a diagnostic for `error` on stderr, or as JSON on stdout
fn report(error: &minion::Error, input: &Path, source: &str, cli: &Cli) {
    let report = ErrorReport::from_error(error, &input.display().to_string(), source);
    if cli.json {
        println!("{}", report.to_json());
    } else {
        eprintln!("{}", report);
    }
}

/// Run a program on the console. Returns whether it finished without error.
fn run_file(input: &Path, cli: &Cli) -> Result<bool> {
    let source = read_source(input)?;
    debug!("running {}", input.display());

    let program = match parse_program(&source) {
        Ok(program) => program,
        Err(e) => {
            report(&e, input, &source, cli);
            return Ok(false);
        }
    };

    let options = ConsoleOptions {
        prefix: if cli.plain {
            None
        } else {
            ConsoleOptions::default().prefix
        },
        precision: cli.precision,
    };
    let program = &program;
    let outcome = thread::scope(|scope| {
        let handle = thread::Builder::new()
            .name("minion-run".to_string())
            .stack_size(RUN_STACK_SIZE)
            .spawn_scoped(scope, move || {
                Evaluator::new(ConsoleEnvironment::stdio(options))
                    .with_max_call_depth(MAX_CALL_DEPTH)
                    .run(program)
            })
            .context("could not start the interpreter thread")?;
        handle
            .join()
            .map_err(|_| anyhow!("interpreter thread panicked"))
    })?;

    if let Err(e) = outcome {
        report(&e, input, &source, cli);
        return Ok(false);
    }
    Ok(true)
}

/// Parse a file without running it
fn check_file(input: &Path, cli: &Cli) -> Result<bool> {
    let source = read_source(input)?;
    let file_name = input.display().to_string();
    let stats = LexicalStats::collect(&source);

    let feedback = match parse_program(&source) {
        Ok(program) => CheckFeedback::success(file_name.clone(), stats, program.items.len()),
        Err(e) => {
            let report = ErrorReport::from_error(&e, &file_name, &source);
            CheckFeedback::failure(file_name.clone(), report, stats)
        }
    };

    if cli.json {
        println!("{}", feedback.to_json());
    } else if feedback.success {
        println!("Checking: {}", file_name);
        println!("No errors found ({} top-level items)", feedback.item_count);
    } else {
        for diagnostic in &feedback.diagnostics {
            eprintln!("{}", diagnostic);
        }
    }
    Ok(feedback.success)
}

fn print_tokens(input: &Path, cli: &Cli) -> Result<bool> {
    let source = read_source(input)?;
    let tokens: Vec<_> = tokenize(&source)
        .into_iter()
        .filter(|token| !token.is_trivia())
        .collect();

    if cli.json {
        let json = serde_json::to_string_pretty(&tokens).context("could not serialize tokens")?;
        println!("{}", json);
    } else {
        for token in &tokens {
            let (line, column) = token.span.line_col(&source);
            let kind = token.kind.to_string();
            println!("{:>4}:{:<3} {:<12} {}", line, column, kind, token.lexeme);
        }
    }
    Ok(true)
}

fn print_stats(input: &Path, cli: &Cli) -> Result<bool> {
    let source = read_source(input)?;
    let stats = LexicalStats::collect(&source);

    if cli.json {
        let json = serde_json::to_string_pretty(&stats).context("could not serialize statistics")?;
        println!("{}", json);
    } else {
        println!("{}", stats);
    }
    Ok(true)
}
