use std::{io, path::PathBuf, process};

use clap::{ArgAction, Parser as ClapParser, Subcommand};
use expression_analyzer::{
    cli::{self, CheckMode, CheckOptions, CliError},
    Analyzer, Config,
};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "exprcheck")]
#[command(about = "Tokenize, validate and format formula expressions")]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an expression and print diagnostics
    Check {
        /// The expression (reads from stdin if not provided)
        expression: Option<String>,

        /// Print a JSON report instead of diagnostics
        #[arg(long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Print the token stream and errors as JSON
    Tokens {
        expression: Option<String>,

        #[arg(short, long)]
        pretty: bool,
    },

    /// Print the parse tree as JSON
    Tree {
        expression: Option<String>,

        #[arg(short, long)]
        pretty: bool,
    },

    /// Reformat an expression
    Format {
        expression: Option<String>,

        /// Spaces per indentation level
        #[arg(long)]
        indent: Option<usize>,

        /// Column limit before breaking lines
        #[arg(long)]
        max_line_length: Option<usize>,

        /// Keep everything on one line
        #[arg(long)]
        no_break: bool,

        /// No spaces around operators
        #[arg(long)]
        compact_ops: bool,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'exprcheck docs' to list categories)
        category: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Runs the command; `Ok(false)` means the expression was invalid.
fn run(cli: Cli) -> Result<bool, CliError> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    tracing::debug!(?config, "loaded configuration");
    let analyzer = Analyzer::with_config(config.analyzer.clone());

    match cli.command {
        Commands::Check {
            expression,
            json,
            pretty,
        } => {
            let mode = if json {
                CheckMode::Report
            } else {
                CheckMode::Diagnostics
            };
            run_check(&analyzer, expression, mode, pretty)
        }
        Commands::Tokens { expression, pretty } => {
            run_check(&analyzer, expression, CheckMode::Tokens, pretty)
        }
        Commands::Tree { expression, pretty } => {
            run_check(&analyzer, expression, CheckMode::Tree, pretty)
        }
        Commands::Format {
            expression,
            indent,
            max_line_length,
            no_break,
            compact_ops,
        } => {
            let mut options = config.format;
            if let Some(indent) = indent {
                options = options.with_indent_size(indent);
            }
            if let Some(max) = max_line_length {
                options = options.with_max_line_length(max);
            }
            if no_break {
                options = options.with_break_long_expressions(false);
            }
            if compact_ops {
                options = options.with_space_around_ops(false);
            }

            let expression = cli::read_expression(expression)?;
            let result = cli::execute_format(&analyzer, &expression, &options);
            if let Some(diagnostics) = &result.diagnostics {
                eprint!("{}", diagnostics);
            }
            println!("{}", result.output);
            Ok(result.valid)
        }
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(true)
        }
        Commands::Doc { category } => {
            print!("{}", cli::get_doc_category(&category)?);
            Ok(true)
        }
    }
}

fn run_check(
    analyzer: &Analyzer,
    expression: Option<String>,
    mode: CheckMode,
    pretty: bool,
) -> Result<bool, CliError> {
    let options = CheckOptions {
        expression: cli::read_expression(expression)?,
        mode,
        pretty,
    };

    let result = cli::execute_check(analyzer, &options)?;
    println!("{}", result.output);
    Ok(result.valid)
}
