use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "spanmark")]
#[command(about = "Find and highlight search terms in a document", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Search a JSON document and print the matches
    Find(FindArgs),

    /// Display the effective configuration
    ShowConfig(ConfigArgs),

    /// Validate the configuration file
    ValidateConfig(ConfigArgs),
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Config file to read instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct FindArgs {
    /// JSON document to search
    pub document: PathBuf,

    /// Term to search for (repeatable, overrides the config file)
    #[arg(short, long = "search")]
    pub search: Vec<String>,

    /// Match case exactly
    #[arg(long)]
    pub case_sensitive: bool,

    /// Only match whole words
    #[arg(long)]
    pub whole_word: bool,

    /// Maximum number of matches across all terms
    #[arg(long)]
    pub max: Option<usize>,

    /// Extra tag whose text is skipped (repeatable)
    #[arg(long = "ignore")]
    pub ignore: Vec<String>,

    /// Highlight name to register the matches under
    #[arg(long)]
    pub name: Option<String>,

    /// Print matches as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.action {
        Action::Find(args) => commands::find::run(args),
        Action::ShowConfig(args) => commands::show_config::run(args),
        Action::ValidateConfig(args) => commands::validate_config::run(args),
    }
}
