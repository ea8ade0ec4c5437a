//! Session aggregation over an ordered stream of normalized blocks.

use std::collections::VecDeque;
use std::num::NonZeroUsize;

use ethers_core::types::U256;

use crate::models::{BlockStats, BlockWithTransactions, BurnedBlockTransaction, Session};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum IngestError {
    #[error("block {candidate} does not advance past last ingested block {last}")]
    NonMonotonicBlock { last: u64, candidate: u64 },
}

/// Folds newly observed blocks into a running [`Session`] aggregate and a
/// newest-first recent-block list.
///
/// The aggregator owns its state exclusively; callers read snapshots. Blocks
/// must arrive in strictly increasing number order — chain reorganizations
/// are not reconciled here, so an out-of-order delivery is rejected rather
/// than reordered.
pub struct SessionAggregator {
    session: Session,
    last_number: Option<u64>,
    recent: VecDeque<BurnedBlockTransaction>,
    capacity: Option<NonZeroUsize>,
}

impl SessionAggregator {
    /// `capacity` bounds the recent-block list; `None` keeps every block.
    pub fn new(capacity: Option<NonZeroUsize>) -> Self {
        Self {
            session: Session::default(),
            last_number: None,
            recent: VecDeque::new(),
            capacity,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn last_block_number(&self) -> Option<u64> {
        self.last_number
    }

    /// Newest-first snapshot of the recent-block list, at most `limit` rows.
    pub fn recent_blocks(&self, limit: Option<usize>) -> Vec<BurnedBlockTransaction> {
        self.recent
            .iter()
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    /// Folds one block into the session.
    ///
    /// `stats` is `None` when the node has not computed burn statistics for
    /// the block yet; the block then contributes zero to every cumulative
    /// total but still counts and still appears in the recent list. The
    /// monotonicity precondition is checked before any mutation, so a
    /// rejected call leaves the session exactly as it was.
    pub fn ingest(
        &mut self,
        block: &BlockWithTransactions,
        stats: Option<&BlockStats>,
    ) -> Result<BurnedBlockTransaction, IngestError> {
        let number = block.header.number;
        if let Some(last) = self.last_number {
            if number <= last {
                return Err(IngestError::NonMonotonicBlock {
                    last,
                    candidate: number,
                });
            }
        }

        let entry = match stats {
            Some(stats) => BurnedBlockTransaction {
                number,
                burned: stats.burned,
                base_fee: stats.base_fee,
                gas_used: stats.gas_used,
                gas_limit: block.header.gas_limit,
                rewards: stats.rewards,
                transactions: block.transactions.len() as u64,
                timestamp: block.header.timestamp,
            },
            None => BurnedBlockTransaction {
                number,
                burned: U256::zero(),
                base_fee: block.header.base_fee_per_gas.unwrap_or_default(),
                gas_used: block.header.gas_used,
                gas_limit: block.header.gas_limit,
                rewards: U256::zero(),
                transactions: block.transactions.len() as u64,
                timestamp: block.header.timestamp,
            },
        };

        if let Some(stats) = stats {
            self.session.burned += stats.burned;
            self.session.tipped += stats.tips;
            self.session.rewards += stats.rewards;
            self.session.min_base_fee = Some(match self.session.min_base_fee {
                Some(min) if min <= stats.base_fee => min,
                _ => stats.base_fee,
            });
            self.session.max_base_fee = Some(match self.session.max_base_fee {
                Some(max) if max >= stats.base_fee => max,
                _ => stats.base_fee,
            });
        }
        self.session.block_count += 1;
        self.last_number = Some(number);

        self.recent.push_front(entry.clone());
        if let Some(capacity) = self.capacity {
            self.recent.truncate(capacity.get());
        }

        Ok(entry)
    }
}

impl Default for SessionAggregator {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BaseBlock;

    fn block(number: u64) -> BlockWithTransactions {
        BlockWithTransactions {
            header: BaseBlock {
                hash: None,
                number,
                size: None,
                timestamp: 1_620_000_000 + number,
                difficulty: None,
                total_difficulty: None,
                base_fee_per_gas: Some(U256::from(7u64)),
                gas_limit: U256::from(30_000_000u64),
                gas_used: U256::from(15_000_000u64),
            },
            transactions: Vec::new(),
        }
    }

    fn stats(number: u64, burned: u64, base_fee: u64) -> BlockStats {
        BlockStats {
            number,
            timestamp: 1_620_000_000 + number,
            base_fee: U256::from(base_fee),
            burned: U256::from(burned),
            gas_target: U256::from(15_000_000u64),
            gas_used: U256::from(15_000_000u64),
            rewards: U256::from(2u64),
            tips: U256::from(3u64),
            transactions: 1,
        }
    }

    #[test]
    fn cumulative_totals_are_exact_sums() {
        let mut agg = SessionAggregator::default();
        agg.ingest(&block(1), Some(&stats(1, 100, 30))).unwrap();
        agg.ingest(&block(2), Some(&stats(2, 250, 30))).unwrap();
        agg.ingest(&block(3), Some(&stats(3, 50, 30))).unwrap();

        let session = agg.session();
        assert_eq!(session.burned, U256::from(400u64));
        assert_eq!(session.tipped, U256::from(9u64));
        assert_eq!(session.rewards, U256::from(6u64));
        assert_eq!(session.block_count, 3);
    }

    #[test]
    fn extrema_track_strict_minimum_and_maximum() {
        let mut agg = SessionAggregator::default();
        for (n, fee) in [(1u64, 30u64), (2, 10), (3, 50), (4, 10)] {
            agg.ingest(&block(n), Some(&stats(n, 0, fee))).unwrap();
        }
        assert_eq!(agg.session().min_base_fee, Some(U256::from(10u64)));
        assert_eq!(agg.session().max_base_fee, Some(U256::from(50u64)));
    }

    #[test]
    fn absent_stats_count_the_block_but_contribute_nothing() {
        let mut agg = SessionAggregator::default();
        agg.ingest(&block(1), Some(&stats(1, 100, 30))).unwrap();
        let before = agg.session().clone();

        let entry = agg.ingest(&block(2), None).unwrap();
        assert_eq!(entry.burned, U256::zero());
        assert_eq!(entry.rewards, U256::zero());

        let after = agg.session();
        assert_eq!(after.block_count, before.block_count + 1);
        assert_eq!(after.burned, before.burned);
        assert_eq!(after.tipped, before.tipped);
        assert_eq!(after.rewards, before.rewards);
        assert_eq!(after.min_base_fee, before.min_base_fee);
        assert_eq!(after.max_base_fee, before.max_base_fee);
    }

    #[test]
    fn non_monotonic_block_is_rejected_without_mutation() {
        let mut agg = SessionAggregator::default();
        agg.ingest(&block(105), Some(&stats(105, 100, 30))).unwrap();
        let before = agg.session().clone();

        let err = agg.ingest(&block(104), Some(&stats(104, 999, 1)));
        assert_eq!(
            err,
            Err(IngestError::NonMonotonicBlock {
                last: 105,
                candidate: 104,
            })
        );
        let dup = agg.ingest(&block(105), None);
        assert!(dup.is_err());

        assert_eq!(agg.session(), &before);
        assert_eq!(agg.recent_blocks(None).len(), 1);
        assert_eq!(agg.last_block_number(), Some(105));
    }

    #[test]
    fn recent_list_is_newest_first_and_bounded() {
        let mut agg = SessionAggregator::new(NonZeroUsize::new(2));
        for n in 1..=4u64 {
            agg.ingest(&block(n), Some(&stats(n, n, 30))).unwrap();
        }
        let recent = agg.recent_blocks(None);
        let numbers: Vec<_> = recent.iter().map(|b| b.number).collect();
        assert_eq!(numbers, vec![4, 3]);

        let limited = agg.recent_blocks(Some(1));
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].number, 4);
    }

    #[test]
    fn unbounded_by_default() {
        let mut agg = SessionAggregator::default();
        for n in 1..=50u64 {
            agg.ingest(&block(n), None).unwrap();
        }
        assert_eq!(agg.recent_blocks(None).len(), 50);
    }
}
