use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use polydoc_codec::Encoding;
use polydoc_server::Mode;

#[derive(Parser)]
#[command(
    name = "polydoc",
    about = "polydoc: one document, served from JSON, YAML or XML",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the document over HTTP
    Serve(ServeArgs),
    /// Write the library seed document if the file does not exist
    Seed(SeedArgs),
    /// Print the document, optionally converted to another encoding
    Dump(DumpArgs),
}

/// Options shared by every command; flags override the config file.
#[derive(Args, Clone, Debug, Default)]
pub struct StoreArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Document file (.json, .yml, .yaml or .xml)
    #[arg(short, long)]
    pub data_file: Option<PathBuf>,
    /// Document shape: collections or library
    #[arg(short, long)]
    pub mode: Option<Mode>,
    /// Root element name for XML documents
    #[arg(long)]
    pub xml_root: Option<String>,
}

#[derive(Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub store: StoreArgs,
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,
}

#[derive(Args)]
pub struct SeedArgs {
    #[command(flatten)]
    pub store: StoreArgs,
    /// Overwrite an existing document
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct DumpArgs {
    #[command(flatten)]
    pub store: StoreArgs,
    /// Target encoding; defaults to the file's own
    #[arg(long)]
    pub to: Option<DumpFormat>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum DumpFormat {
    Json,
    Yaml,
    Xml,
}

impl From<DumpFormat> for Encoding {
    fn from(format: DumpFormat) -> Self {
        match format {
            DumpFormat::Json => Encoding::Json,
            DumpFormat::Yaml => Encoding::Yaml,
            DumpFormat::Xml => Encoding::Xml,
        }
    }
}
