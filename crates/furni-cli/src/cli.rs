use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "furni",
    about = "Furnidata editor backend: serve and edit furniture catalogs",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML configuration file; built-in defaults when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Show a catalog, or one item in it
    Show(ShowArgs),
    /// Update fields of an existing item
    Update(UpdateArgs),
    /// Add a new item
    Add(AddArgs),
    /// Upload an icon or furniture package
    Upload(UploadArgs),
    /// Print the effective configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Override the configured bind address
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Catalog filename; the configured default when omitted
    #[arg(short, long)]
    pub file: Option<String>,
    /// Only show the item with this id
    #[arg(long)]
    pub item: Option<String>,
}

#[derive(Args)]
pub struct UpdateArgs {
    pub item_id: String,
    /// `field=value` assignments; values are parsed as JSON, else taken as text
    #[arg(short, long = "set", value_name = "FIELD=VALUE", required = true)]
    pub set: Vec<String>,
    #[arg(short, long)]
    pub file: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(short, long = "set", value_name = "FIELD=VALUE")]
    pub set: Vec<String>,
    #[arg(short, long)]
    pub file: Option<String>,
}

#[derive(Args)]
pub struct UploadArgs {
    pub path: PathBuf,
    /// Declared media type; guessed from the extension when omitted
    #[arg(long)]
    pub media_type: Option<String>,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Print the built-in defaults instead of the loaded file
    #[arg(long)]
    pub defaults: bool,
}
