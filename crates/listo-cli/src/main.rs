#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use listo_core::config::{EffectiveConfig, resolve_config};
use listo_core::error::ErrorCode;
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "listo: a two-section to-do list with stable manual ordering",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format (overrides --json and FORMAT).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Directory holding the store (overrides LISTO_DATA_DIR and config).
    #[arg(long, global = true, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Items",
        about = "Add a new item",
        long_about = "Add a new item to the end of the in-progress section.",
        after_help = "EXAMPLES:\n    # Add an item\n    lo add Buy milk\n\n    # Add with labels\n    lo add Call the bank --label red --label yellow\n\n    # Emit machine-readable output\n    lo add Buy milk --json"
    )]
    Add(cmd::add::AddArgs),

    #[command(
        next_help_heading = "Read",
        about = "List items by section",
        long_about = "List items in their stored order, in-progress first, then completed.",
        after_help = "EXAMPLES:\n    # List everything\n    lo list\n\n    # Search and filter by label\n    lo list --search milk --label green\n\n    # One section only\n    lo list --section completed"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Items",
        about = "Mark an item completed",
        after_help = "EXAMPLES:\n    # Complete item 3\n    lo done 3"
    )]
    Done(cmd::status::StatusArgs),

    #[command(
        next_help_heading = "Items",
        about = "Mark an item in progress again",
        after_help = "EXAMPLES:\n    # Reopen item 3\n    lo reopen 3"
    )]
    Reopen(cmd::status::StatusArgs),

    #[command(
        next_help_heading = "Items",
        about = "Delete an item",
        after_help = "EXAMPLES:\n    # Delete item 3\n    lo rm 3"
    )]
    Rm(cmd::rm::RmArgs),

    #[command(
        next_help_heading = "Items",
        about = "Toggle a label on an item",
        long_about = "Add the label if the item lacks it, remove it otherwise.",
        after_help = "EXAMPLES:\n    # Toggle the red label on item 3\n    lo label 3 red"
    )]
    Label(cmd::label::LabelArgs),

    #[command(
        next_help_heading = "Ordering",
        about = "Move an item to another item's slot",
        long_about = "Move an item into the slot of another item in the same section.",
        after_help = "EXAMPLES:\n    # Put item 4 where item 2 is\n    lo move 4 --to 2\n\n    # Emit machine-readable output\n    lo move 4 --to 2 --json"
    )]
    Move(cmd::move_cmd::MoveArgs),

    #[command(
        next_help_heading = "Ordering",
        about = "Print a section's key ordering",
        after_help = "EXAMPLES:\n    # Show in-progress ordering\n    lo order in-progress"
    )]
    Order(cmd::order::OrderArgs),

    #[command(
        next_help_heading = "Maintenance",
        about = "Report the stored-data migration",
        long_about = "Report what the startup migration did to bring stored data to the current version.",
        after_help = "EXAMPLES:\n    # Show the migration outcome\n    lo migrate\n\n    # Emit machine-readable output\n    lo migrate --json"
    )]
    Migrate,

    #[command(
        next_help_heading = "Maintenance",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    lo completions bash\n\n    # Generate zsh completions\n    lo completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("LISTO_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "listo=debug,lo=debug,info"
        } else {
            "listo=info,warn"
        })
    });

    let format = env::var("LISTO_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<(EffectiveConfig, OutputMode)> {
    let project_root = env::current_dir()?;
    match resolve_config(&project_root, cli.data_dir.as_deref()) {
        Ok(config) => {
            let output = resolve_output_mode(cli.format, cli.json, config.user.output.as_deref());
            Ok((config, output))
        }
        Err(err) => {
            let output = resolve_output_mode(cli.format, cli.json, None);
            render_error(
                output,
                &CliError::with_code(format!("{err:#}"), ErrorCode::ConfigParseError),
            )?;
            Err(err)
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    if let Commands::Completions(args) = &cli.command {
        let mut command = Cli::command();
        return cmd::completions::run_completions(args.shell, &mut command);
    }

    let (config, output) = load_config(&cli)?;
    info!(data_dir = %config.data_dir.display(), "opening store");
    let mut session = cmd::Session::open(&config);

    match &cli.command {
        Commands::Add(args) => cmd::add::run_add(args, output, &mut session),
        Commands::List(args) => cmd::list::run_list(args, output, &mut session),
        Commands::Done(args) => cmd::status::run_set_status(args, true, output, &mut session),
        Commands::Reopen(args) => cmd::status::run_set_status(args, false, output, &mut session),
        Commands::Rm(args) => cmd::rm::run_rm(args, output, &mut session),
        Commands::Label(args) => cmd::label::run_label(args, output, &mut session),
        Commands::Move(args) => cmd::move_cmd::run_move(args, output, &mut session),
        Commands::Order(args) => cmd::order::run_order(args, output, &mut session),
        Commands::Migrate => cmd::migrate::run_migrate(output, &session),
        Commands::Completions(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn json_flag_parses_after_subcommand() {
        let cli = Cli::parse_from(["lo", "list", "--json"]);
        assert!(cli.json);
    }

    #[test]
    fn format_flag_parses_value_enum() {
        let cli = Cli::parse_from(["lo", "--format", "text", "order", "completed"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
        assert!(matches!(cli.command, Commands::Order(_)));
    }

    #[test]
    fn data_dir_is_global() {
        let cli = Cli::parse_from(["lo", "done", "3", "--data-dir", "/tmp/x"]);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        assert!(matches!(cli.command, Commands::Done(ref a) if a.key == 3));
    }

    #[test]
    fn reopen_and_done_share_args() {
        let cli = Cli::parse_from(["lo", "reopen", "9"]);
        assert!(matches!(cli.command, Commands::Reopen(ref a) if a.key == 9));
    }

    #[test]
    fn migrate_takes_no_arguments() {
        assert!(Cli::try_parse_from(["lo", "migrate", "extra"]).is_err());
        assert!(matches!(
            Cli::parse_from(["lo", "migrate"]).command,
            Commands::Migrate
        ));
    }

    #[test]
    fn verbose_short_flag() {
        let cli = Cli::parse_from(["lo", "-v", "list"]);
        assert!(cli.verbose);
    }
}
