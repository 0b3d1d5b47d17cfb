use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use vitrine_core::ItemId;

mod commands;
mod config;

use commands::Target;
use config::Config;

#[derive(Debug, Parser)]
#[command(name = "vitrine", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the catalog CSV (default: data/clean_data.csv)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Recommend products similar to a selected product
    ///
    /// Builds a TF-IDF index over the catalog's Tags column and ranks every
    /// other product by cosine similarity to the selected one:
    ///
    /// - Tags are lowercased and split on non-alphanumeric characters
    /// - English stop words and single characters are ignored
    /// - Equal scores keep catalog order
    ///
    /// Products are selected by exact name. When several products share a
    /// name the first one in the catalog is used; pass --id to select a
    /// specific row instead. Ids are shown next to each recommendation, and
    /// 'status' lists the ids behind every shared name.
    Recommend {
        /// Exact product name
        #[arg(required_unless_present = "id")]
        name: Option<String>,

        /// Select the product by id instead of name
        #[arg(long, conflicts_with = "name")]
        id: Option<ItemId>,

        /// Number of recommendations (default from config, 10)
        #[arg(short = 'n', long)]
        top_n: Option<usize>,

        /// Print recommendations as JSON
        #[arg(long)]
        json: bool,
    },
    /// List product names that can be selected
    Names {
        /// Show at most this many names
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show catalog and index statistics
    Status,
    /// Interactive recommendation shell with background reload
    Shell {
        /// Number of recommendations per query (default from config, 10)
        #[arg(short = 'n', long)]
        top_n: Option<usize>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print one value, or the whole config file
    Get { key: Option<String> },
    /// Set a value in the config file
    Set { key: String, value: String },
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.catalog {
        Some(path) => Config::load_with_catalog_path(path)?,
        None => Config::load()?,
    };
    config::init_logging(&config.logging)?;

    match cli.command {
        Commands::Recommend {
            name,
            id,
            top_n,
            json,
        } => {
            let target = match (id, name) {
                (Some(id), _) => Target::Id(id),
                (None, Some(name)) => Target::Name(name),
                (None, None) => anyhow::bail!("Pass a product name or --id"),
            };
            commands::run_recommend(&config, target, top_n.unwrap_or(config.top_n), json)?;
        }
        Commands::Names { limit } => {
            commands::list_names(&config, limit)?;
        }
        Commands::Status => {
            commands::show_status(&config)?;
        }
        Commands::Shell { top_n } => {
            commands::run_shell(&config, top_n.unwrap_or(config.top_n)).await?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config()?,
            ConfigAction::Get { key } => commands::config::get_config(key)?,
            ConfigAction::Set { key, value } => commands::config::set_config(key, value)?,
            ConfigAction::Path => commands::config::show_path()?,
            ConfigAction::Example => commands::config::show_example()?,
            ConfigAction::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}
