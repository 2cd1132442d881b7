use clap::{Parser, Subcommand};

use super::{create::CreateArg, extract::ExtractArg, list::ListArg, read::ReadArg};

#[derive(Clone, Debug, Parser)]
#[command(
    name = "tarpack",
    version = env!("CARGO_PKG_VERSION"),
    about = "Create, read and extract .tar.gz archives",
    long_about = None,
    propagate_version = true
)]
pub struct App {
    #[command(subcommand)]
    pub cmd: Commands,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "c", name = "create", about = "Pack a directory into a .tar.gz archive")]
    Create(CreateArg),
    #[command(alias = "r", name = "read", about = "Print the content of matching entries")]
    Read(ReadArg),
    #[command(alias = "ls", name = "list", about = "List archive entries")]
    List(ListArg),
    #[command(alias = "x", name = "extract", about = "Extract matching entries to a directory")]
    Extract(ExtractArg),
}
