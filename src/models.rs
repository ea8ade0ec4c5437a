use ethers_core::types::U256;
use serde::Serialize;

/// A mined (or pending) transaction with hex quantities decoded.
///
/// Fields the node may legitimately omit (pending transactions have no block
/// number, legacy transactions carry no EIP-1559 fee caps) stay `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub hash: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub nonce: u64,
    pub block_number: Option<u64>,
    pub transaction_index: Option<u64>,
    #[serde(rename = "type")]
    pub tx_type: Option<u64>,
    pub v: Option<u64>,
    pub gas: U256,
    pub gas_price: Option<U256>,
    pub max_priority_fee_per_gas: Option<U256>,
    pub max_fee_per_gas: Option<U256>,
    /// Always 0: the source's confirmation count is not trusted.
    pub confirmations: u64,
}

/// A block header. `base_fee_per_gas` is absent on pre-London blocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseBlock {
    pub hash: Option<String>,
    pub number: u64,
    pub size: Option<u64>,
    pub timestamp: u64,
    pub difficulty: Option<u64>,
    pub total_difficulty: Option<u64>,
    pub base_fee_per_gas: Option<U256>,
    pub gas_limit: U256,
    pub gas_used: U256,
}

/// A block header plus its full transaction list, in the node's order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockWithTransactions {
    #[serde(flatten)]
    pub header: BaseBlock,
    pub transactions: Vec<Transaction>,
}

/// Derived burn/reward statistics for a single block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStats {
    pub number: u64,
    pub timestamp: u64,
    pub base_fee: U256,
    pub burned: U256,
    pub gas_target: U256,
    pub gas_used: U256,
    pub rewards: U256,
    pub tips: U256,
    /// Transaction count, not a list.
    pub transactions: u64,
}

/// Sync-progress counters reported by a node that is still catching up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncProgress {
    pub starting_block: u64,
    pub current_block: u64,
    pub highest_block: u64,
    pub known_states: Option<u64>,
    pub pulled_states: Option<u64>,
}

/// The node's `eth_syncing` reply: the literal `false` when fully synced,
/// otherwise a progress record. A tagged union, not a record with null fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SyncStatus {
    Synced,
    Syncing(SyncProgress),
}

/// Lifetime burn/tip totals reported by the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub burned: U256,
    pub tipped: U256,
}

/// One row of the recent-block list: a normalized block joined with its
/// burn statistics. Blocks whose stats the node has not computed yet carry
/// zero burn/reward fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnedBlockTransaction {
    pub number: u64,
    pub burned: U256,
    #[serde(rename = "basefee")]
    pub base_fee: U256,
    pub gas_used: U256,
    pub gas_limit: U256,
    pub rewards: U256,
    pub transactions: u64,
    pub timestamp: u64,
}

/// Running aggregate since process start. Wei-denominated totals accumulate
/// exactly; the extrema are set by the first block with stats and only move
/// on a strictly smaller/larger observation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub burned: U256,
    pub tipped: U256,
    pub rewards: U256,
    pub block_count: u64,
    pub min_base_fee: Option<U256>,
    pub max_base_fee: Option<U256>,
}
