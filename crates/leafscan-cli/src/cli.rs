use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "leafscan",
    about = "Leafscan: leaf disease analysis with a hash-linked prediction ledger",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Print the BLAKE3 digest of an image
    Digest(DigestArgs),
    /// Classify an image locally with the demo backend
    Classify(ClassifyArgs),
    /// Print the default server configuration as TOML
    Config,
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Override the listen address
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

#[derive(Args)]
pub struct DigestArgs {
    pub file: PathBuf,
}

#[derive(Args)]
pub struct ClassifyArgs {
    pub file: PathBuf,
    /// Number of ranked classes to show
    #[arg(short = 'n', long, default_value_t = 3)]
    pub top: usize,
}
