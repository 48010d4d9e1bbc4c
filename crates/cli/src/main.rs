mod commands;
mod dump;

use std::path::PathBuf;
use std::process;

use clap::{Arg, ArgAction, CommandFactory, FromArgMatches, Parser, Subcommand, ValueEnum};
use env_logger::{Builder, Target};
use log::LevelFilter;
use metricc_core::{ParseError, PropagationStrategy};

/// Exit code for every failure: usage, I/O and description errors alike.
pub(crate) const EXIT_FAILURE: i32 = 2;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// How block levels are propagated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PropagationArg {
    /// Lift lone braces to their neighbour's level
    Heuristic,
    /// Lift every line of a block to the block's highest level
    BlockTree,
}

impl From<PropagationArg> for PropagationStrategy {
    fn from(arg: PropagationArg) -> Self {
        match arg {
            PropagationArg::Heuristic => PropagationStrategy::Heuristic,
            PropagationArg::BlockTree => PropagationStrategy::BlockTree,
        }
    }
}

/// Metric description compiler.
#[derive(Parser)]
#[command(
    name = "metricc",
    version,
    about = "Compile metric descriptions into C scoring code",
    disable_version_flag = true
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress error messages (the exit code still reports failure)
    #[arg(long, global = true)]
    quiet: bool,

    /// Set log filter value [ off, error, warn, info, debug, trace ]
    #[arg(long, global = true, default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a metric description and weave it into a C template
    Compile {
        /// Path to the .metric description
        description: PathBuf,
        /// Path to the C template carrying METRIC_* markers
        #[arg(required_unless_present = "debug")]
        template: Option<PathBuf>,
        /// Dump the compiled description instead of generating code
        #[arg(long)]
        debug: bool,
        /// Block level propagation strategy
        #[arg(long, default_value = "heuristic", value_enum)]
        propagation: PropagationArg,
    },

    /// List the quantities every description can use
    Builtins,
}

/// Built-in quantities, appended to `--help`.
fn builtins_help() -> Result<String, ParseError> {
    let mut text = String::from("Built-in quantities:");
    for (section, entries) in commands::builtins::builtin_sections()? {
        text.push_str(&format!("\n\n  available in {} routines:", section));
        for (name, doc) in entries {
            text.push_str(&format!("\n    {}: {}", name, doc));
        }
    }
    Ok(text)
}

fn main() {
    let builtins = builtins_help().unwrap_or_else(|e| {
        eprintln!("{}", e);
        process::exit(EXIT_FAILURE);
    });
    let matches = Cli::command()
        .arg(
            Arg::new("version")
                .short('v')
                .long("version")
                .action(ArgAction::Version)
                .help("Print version"),
        )
        .after_help(builtins)
        .get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let mut builder = Builder::new();
    builder
        .filter_level(cli.log_level)
        .parse_default_env()
        .target(Target::Stderr)
        .init();

    match cli.command {
        Commands::Compile {
            description,
            template,
            debug,
            propagation,
        } => {
            commands::compile::cmd_compile(
                &description,
                template.as_deref(),
                debug,
                propagation.into(),
                cli.output,
                cli.quiet,
            );
        }
        Commands::Builtins => {
            commands::builtins::cmd_builtins(cli.output, cli.quiet);
        }
    }
}

/// Print a plain error message in the selected format.
pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}

/// Print a structured error in the selected format.
pub(crate) fn report_json_error(
    value: &serde_json::Value,
    display: &str,
    output: OutputFormat,
    quiet: bool,
) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => {
            let err_json = serde_json::to_string_pretty(value)
                .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", display));
            eprintln!("{}", err_json);
        }
        OutputFormat::Text => eprintln!("{}", display),
    }
}
