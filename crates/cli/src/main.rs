mod cmd;
mod import;
mod logging;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "mdq", version, about = "Query a markdown vault through an in-memory index")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate configuration and print the resolved settings
    Doctor,

    /// Import the vault and print index statistics
    Stats(StatsArgs),

    /// Evaluate a JSON query tree against the vault
    Query(QueryArgs),

    /// List tags with the number of documents carrying them
    Tags(TagsArgs),

    /// List documents linking to a note
    Backlinks(BacklinksArgs),
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    /// Ids only, one per line
    Quiet,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Print statistics as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Query tree as JSON, e.g. '{"compare": {"key": "tag", "op": "=", ...}}'
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub query: Option<String>,

    /// Read the query tree from a file instead
    #[arg(long, short)]
    pub file: Option<PathBuf>,

    #[arg(long, short, value_enum, default_value_t)]
    pub output: OutputFormat,

    /// Shorthand for --output json
    #[arg(long)]
    pub json: bool,

    /// Shorthand for --output quiet
    #[arg(long, short)]
    pub quiet: bool,
}

#[derive(Debug, Args)]
pub struct TagsArgs {
    /// Only show tags starting with this prefix
    #[arg(long)]
    pub prefix: Option<String>,

    #[arg(long, short, value_enum, default_value_t)]
    pub output: OutputFormat,

    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct BacklinksArgs {
    /// Note path or name (e.g. "projects/alpha.md" or "alpha")
    pub note: String,

    #[arg(long, short, value_enum, default_value_t)]
    pub output: OutputFormat,

    #[arg(long)]
    pub json: bool,

    #[arg(long, short)]
    pub quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Doctor => cmd::doctor::run(config, profile),
        Commands::Stats(args) => cmd::stats::run(config, profile, args),
        Commands::Query(args) => cmd::query::run(config, profile, args),
        Commands::Tags(args) => cmd::tags::run(config, profile, args),
        Commands::Backlinks(args) => cmd::backlinks::run(config, profile, args),
    }
}
