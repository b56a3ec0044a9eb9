use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use tabhost_cli::OutputFormat;
use tabhost_cli::commands;

#[derive(Parser)]
#[command(name = "tabhost")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "A CLI tool for replaying browser tab lifecycle scenarios",
    long_about = "Tabhost drives the tab lifecycle controller against an in-memory content host. \
                  Scenario files script window and tab operations (create, detach, pin, move, close) \
                  and check the resulting tab and window state."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (json, table, pretty)
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario file and report the final tab and window state
    Run {
        /// Path to the scenario file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Include the lifecycle notification log
        #[arg(long)]
        events: bool,

        /// Check record and strip consistency after every step
        #[arg(long)]
        check_invariants: bool,

        /// Controller config file (overrides the scenario's own config)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Check that a scenario file parses and refers only to known labels
    Validate {
        /// Path to the scenario file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Generate shell completion scripts
    #[command(long_about = "Generate shell completion scripts for tabhost.

SUPPORTED SHELLS:
    bash, zsh, fish, powershell, elvish

INSTALLATION:
    bash:  tabhost completion --shell bash >> ~/.bashrc
    zsh:   tabhost completion --shell zsh > ~/.zfunc/_tabhost
           (add `fpath=(~/.zfunc $fpath)` to ~/.zshrc)
    fish:  tabhost completion --shell fish > ~/.config/fish/completions/tabhost.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Execute the command
    match cli.command {
        Commands::Run {
            file,
            events,
            check_invariants,
            config,
        } => {
            let options = commands::run::RunOptions {
                config,
                check_invariants,
                events,
            };
            commands::run::execute(&file, &options, cli.format)
        }
        Commands::Validate { file } => commands::validate::execute(&file, cli.format),
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("tabhost=debug,tabhost_core=debug,tabhost_browser=debug")
    } else {
        EnvFilter::new("tabhost=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
