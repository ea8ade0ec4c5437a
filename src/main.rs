mod cli;

use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::sync::RwLock;

use burnwatch::api::{self, AppState};
use burnwatch::config::Config;
use burnwatch::eth::{
    normalize_block_stats, normalize_block_with_transactions, normalize_sync_status,
    normalize_totals, normalize_transaction, RawBlockStats, RawBlockWithTransactions,
    RawSyncStatus, RawTotals, RawTransaction,
};
use burnwatch::replay;
use burnwatch::session::SessionAggregator;

use crate::cli::{Cli, Commands, PayloadKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;

    match cli.command {
        Commands::Replay { file, capacity } => {
            let capacity = match capacity {
                Some(n) => NonZeroUsize::new(n),
                None => config.recent_blocks_capacity,
            };
            let mut aggregator = SessionAggregator::new(capacity);
            let stats = replay::replay_file(&file, &mut aggregator)?;
            tracing::info!(
                "replayed {:?}: {} ingested, {} skipped, {} malformed, {} without stats",
                file,
                stats.ingested,
                stats.skipped,
                stats.malformed,
                stats.stats_missing
            );
            println!("{}", serde_json::to_string_pretty(aggregator.session())?);
        }
        Commands::Serve { addr, file } => {
            let mut aggregator = SessionAggregator::new(config.recent_blocks_capacity);
            if let Some(file) = file {
                let stats = replay::replay_file(&file, &mut aggregator)?;
                tracing::info!(
                    "seeded session from {:?}: {} blocks ingested",
                    file,
                    stats.ingested
                );
            }
            let state = AppState {
                aggregator: Arc::new(RwLock::new(aggregator)),
            };
            let bind = addr.unwrap_or_else(|| config.http_bind_addr.clone());
            api::run_http_server(&bind, state).await?;
        }
        Commands::Decode { file, kind } => {
            decode_payload(&file, kind)?;
        }
    }

    Ok(())
}

fn decode_payload(path: &Path, kind: PayloadKind) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read payload {:?}", path))?;

    let output = match kind {
        PayloadKind::Block => {
            let raw: RawBlockWithTransactions = serde_json::from_str(&text)?;
            serde_json::to_string_pretty(&normalize_block_with_transactions(raw)?)?
        }
        PayloadKind::Tx => {
            let raw: RawTransaction = serde_json::from_str(&text)?;
            serde_json::to_string_pretty(&normalize_transaction(raw)?)?
        }
        PayloadKind::Stats => {
            let raw: Option<RawBlockStats> = serde_json::from_str(&text)?;
            serde_json::to_string_pretty(&normalize_block_stats(raw)?)?
        }
        PayloadKind::Sync => {
            let raw: RawSyncStatus = serde_json::from_str(&text)?;
            serde_json::to_string_pretty(&normalize_sync_status(raw)?)?
        }
        PayloadKind::Totals => {
            let raw: RawTotals = serde_json::from_str(&text)?;
            serde_json::to_string_pretty(&normalize_totals(raw)?)?
        }
    };

    println!("{}", output);
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
}
