use clap::{Parser, Subcommand};
use colored::Colorize;
use formshift::commands;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "formshift")]
#[command(about = "Convert legacy Nexacro forms into React components", long_about = None)]
#[command(version)]
struct Cli {
    /// Show debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new formshift project
    Init {
        /// Name of the project
        name: String,
    },
    /// Convert legacy forms to React components
    /// Works with both project directories (formshift.toml) and single markup files
    Convert {
        /// Path to project directory or markup file (defaults to current directory)
        #[arg(default_value = ".")]
        target: String,
        /// Print the conversion outcome as JSON instead of writing files
        #[arg(long)]
        json: bool,
    },
    /// Watch for changes and reconvert automatically
    Watch {
        /// Path to project directory (defaults to current directory)
        #[arg(default_value = ".")]
        target: String,
    },
    /// Show the component mapping table, or the rule for one kind
    Mappings {
        /// Legacy component kind, e.g. Button
        kind: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Init { name } => {
            commands::init::execute(&name)
        }
        Commands::Convert { target, json } => {
            commands::convert::execute(&target, json)
        }
        Commands::Watch { target } => {
            commands::watch::execute(&target)
        }
        Commands::Mappings { kind } => {
            commands::mappings::execute(kind.as_deref())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
