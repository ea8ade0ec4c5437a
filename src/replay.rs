//! Replays a captured block stream through the session aggregator.
//!
//! A capture file holds one JSON record per line, each a block paired with
//! its (possibly null) burn statistics. Per-record failures never poison the
//! accumulated session: a malformed record is logged and counted, and a
//! block that does not advance the chain is treated as a duplicate delivery
//! and discarded.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::eth::{normalize_block_stats, normalize_block_with_transactions, CaptureRecord};
use crate::session::{IngestError, SessionAggregator};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayStats {
    pub ingested: u64,
    pub skipped: u64,
    pub malformed: u64,
    pub stats_missing: u64,
}

pub fn replay_file(path: &Path, aggregator: &mut SessionAggregator) -> Result<ReplayStats> {
    let file = File::open(path).with_context(|| format!("failed to open capture {:?}", path))?;
    let mut stats = ReplayStats::default();

    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("failed reading capture line {}", idx + 1))?;
        if line.trim().is_empty() {
            continue;
        }

        let record: CaptureRecord = match serde_json::from_str(&line) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!("capture line {}: unparseable record: {}", idx + 1, err);
                stats.malformed += 1;
                continue;
            }
        };

        let block = match normalize_block_with_transactions(record.block) {
            Ok(block) => block,
            Err(err) => {
                tracing::warn!("capture line {}: {}", idx + 1, err);
                stats.malformed += 1;
                continue;
            }
        };
        let block_stats = match normalize_block_stats(record.stats) {
            Ok(block_stats) => block_stats,
            Err(err) => {
                tracing::warn!("capture line {}: {}", idx + 1, err);
                stats.malformed += 1;
                continue;
            }
        };
        match aggregator.ingest(&block, block_stats.as_ref()) {
            Ok(_) => {
                stats.ingested += 1;
                if block_stats.is_none() {
                    stats.stats_missing += 1;
                }
            }
            Err(err @ IngestError::NonMonotonicBlock { .. }) => {
                tracing::warn!("capture line {}: discarding: {}", idx + 1, err);
                stats.skipped += 1;
            }
        }
    }

    Ok(stats)
}
