use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "burnwatch", version, about = "Ethereum burned-fee session observer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a captured block stream and print the session aggregate
    Replay {
        /// Capture file, one JSON block record per line
        #[arg(long)]
        file: PathBuf,
        /// Recent-block list bound; 0 keeps every block
        #[arg(long)]
        capacity: Option<usize>,
    },
    /// Serve session and recent-block snapshots over HTTP
    Serve {
        /// Override bind address, e.g. 0.0.0.0:8080
        #[arg(long)]
        addr: Option<String>,
        /// Optional capture to replay before serving
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Normalize a single raw JSON-RPC payload and print the typed record
    Decode {
        #[arg(long)]
        file: PathBuf,
        #[arg(long, value_enum)]
        kind: PayloadKind,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum PayloadKind {
    Block,
    Tx,
    Stats,
    Sync,
    Totals,
}
