//! Normalization of raw JSON-RPC payloads into typed domain records.
//!
//! Ethereum nodes encode every numeric field as a `0x`-prefixed hex string
//! because JSON numbers cannot carry 256-bit quantities. Plain counters
//! (block numbers, indices, timestamps) decode to `u64`; anything
//! denominated in wei decodes to `U256`.

use ethers_core::types::U256;
use serde::Deserialize;

use crate::models::{
    BaseBlock, BlockStats, BlockWithTransactions, SyncProgress, SyncStatus, Totals, Transaction,
};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("malformed hex quantity in `{field}`: {value:?}")]
    MalformedHex { field: &'static str, value: String },
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("unexpected `true` in eth_syncing reply")]
    UnexpectedSyncFlag,
}

/// Decodes a `0x`-prefixed hex quantity into a plain integer.
pub fn decode_u64(field: &'static str, value: &str) -> Result<u64, NormalizeError> {
    let digits = strip_hex_prefix(field, value)?;
    u64::from_str_radix(digits, 16).map_err(|_| NormalizeError::MalformedHex {
        field,
        value: value.to_string(),
    })
}

/// Decodes a `0x`-prefixed hex quantity into an arbitrary-precision integer.
/// Wei-denominated values routinely exceed the 53-bit safe range of a JSON
/// number, and can exceed 64 bits outright.
pub fn decode_u256(field: &'static str, value: &str) -> Result<U256, NormalizeError> {
    let digits = strip_hex_prefix(field, value)?;
    U256::from_str_radix(digits, 16).map_err(|_| NormalizeError::MalformedHex {
        field,
        value: value.to_string(),
    })
}

/// Canonical lowercase `0x` rendering of a quantity, without leading zeros.
pub fn encode_u256(value: U256) -> String {
    format!("0x{value:x}")
}

fn strip_hex_prefix<'a>(
    field: &'static str,
    value: &'a str,
) -> Result<&'a str, NormalizeError> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(|| NormalizeError::MalformedHex {
            field,
            value: value.to_string(),
        })?;
    if digits.is_empty() {
        return Err(NormalizeError::MalformedHex {
            field,
            value: value.to_string(),
        });
    }
    Ok(digits)
}

fn opt_u64(
    field: &'static str,
    value: Option<&String>,
) -> Result<Option<u64>, NormalizeError> {
    value.map(|v| decode_u64(field, v)).transpose()
}

fn opt_u256(
    field: &'static str,
    value: Option<&String>,
) -> Result<Option<U256>, NormalizeError> {
    value.map(|v| decode_u256(field, v)).transpose()
}

fn req_u64(field: &'static str, value: Option<&String>) -> Result<u64, NormalizeError> {
    let v = value.ok_or(NormalizeError::MissingField(field))?;
    decode_u64(field, v)
}

fn req_u256(field: &'static str, value: Option<&String>) -> Result<U256, NormalizeError> {
    let v = value.ok_or(NormalizeError::MissingField(field))?;
    decode_u256(field, v)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    pub hash: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub nonce: Option<String>,
    pub block_number: Option<String>,
    pub transaction_index: Option<String>,
    #[serde(rename = "type")]
    pub tx_type: Option<String>,
    pub v: Option<String>,
    pub gas: Option<String>,
    pub gas_price: Option<String>,
    pub max_priority_fee_per_gas: Option<String>,
    pub max_fee_per_gas: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBaseBlock {
    pub hash: Option<String>,
    pub number: Option<String>,
    pub size: Option<String>,
    pub timestamp: Option<String>,
    pub difficulty: Option<String>,
    pub total_difficulty: Option<String>,
    pub base_fee_per_gas: Option<String>,
    pub gas_limit: Option<String>,
    pub gas_used: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBlockWithTransactions {
    #[serde(flatten)]
    pub header: RawBaseBlock,
    pub transactions: Option<Vec<RawTransaction>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlockStats {
    pub number: Option<String>,
    pub timestamp: Option<String>,
    pub base_fee: Option<String>,
    pub burned: Option<String>,
    pub gas_target: Option<String>,
    pub gas_used: Option<String>,
    pub rewards: Option<String>,
    pub tips: Option<String>,
    pub transactions: Option<String>,
}

/// The `eth_syncing` reply is either the literal `false` or a progress record.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawSyncStatus {
    Flag(bool),
    Progress(RawSyncProgress),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSyncProgress {
    pub starting_block: Option<String>,
    pub current_block: Option<String>,
    pub highest_block: Option<String>,
    pub known_states: Option<String>,
    pub pulled_states: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTotals {
    pub burned: Option<String>,
    pub tipped: Option<String>,
}

/// One observation in a capture stream: a block and its possibly-null stats.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureRecord {
    pub block: RawBlockWithTransactions,
    pub stats: Option<RawBlockStats>,
}

pub fn normalize_transaction(raw: RawTransaction) -> Result<Transaction, NormalizeError> {
    Ok(Transaction {
        hash: raw.hash,
        from: raw.from,
        to: raw.to,
        nonce: req_u64("nonce", raw.nonce.as_ref())?,
        block_number: opt_u64("blockNumber", raw.block_number.as_ref())?,
        transaction_index: opt_u64("transactionIndex", raw.transaction_index.as_ref())?,
        tx_type: opt_u64("type", raw.tx_type.as_ref())?,
        v: opt_u64("v", raw.v.as_ref())?,
        gas: req_u256("gas", raw.gas.as_ref())?,
        gas_price: opt_u256("gasPrice", raw.gas_price.as_ref())?,
        max_priority_fee_per_gas: opt_u256(
            "maxPriorityFeePerGas",
            raw.max_priority_fee_per_gas.as_ref(),
        )?,
        max_fee_per_gas: opt_u256("maxFeePerGas", raw.max_fee_per_gas.as_ref())?,
        confirmations: 0,
    })
}

pub fn normalize_block(raw: RawBaseBlock) -> Result<BaseBlock, NormalizeError> {
    Ok(BaseBlock {
        hash: raw.hash,
        number: req_u64("number", raw.number.as_ref())?,
        size: opt_u64("size", raw.size.as_ref())?,
        timestamp: req_u64("timestamp", raw.timestamp.as_ref())?,
        difficulty: opt_u64("difficulty", raw.difficulty.as_ref())?,
        total_difficulty: opt_u64("totalDifficulty", raw.total_difficulty.as_ref())?,
        base_fee_per_gas: opt_u256("baseFeePerGas", raw.base_fee_per_gas.as_ref())?,
        gas_limit: req_u256("gasLimit", raw.gas_limit.as_ref())?,
        gas_used: req_u256("gasUsed", raw.gas_used.as_ref())?,
    })
}

pub fn normalize_block_with_transactions(
    raw: RawBlockWithTransactions,
) -> Result<BlockWithTransactions, NormalizeError> {
    let header = normalize_block(raw.header)?;
    let transactions = raw
        .transactions
        .unwrap_or_default()
        .into_iter()
        .map(normalize_transaction)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(BlockWithTransactions {
        header,
        transactions,
    })
}

/// An absent input means the node has not computed stats for the block yet;
/// that propagates as `None`, never as an error or a zeroed record.
pub fn normalize_block_stats(
    raw: Option<RawBlockStats>,
) -> Result<Option<BlockStats>, NormalizeError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    Ok(Some(BlockStats {
        number: req_u64("number", raw.number.as_ref())?,
        timestamp: req_u64("timestamp", raw.timestamp.as_ref())?,
        base_fee: req_u256("baseFee", raw.base_fee.as_ref())?,
        burned: req_u256("burned", raw.burned.as_ref())?,
        gas_target: req_u256("gasTarget", raw.gas_target.as_ref())?,
        gas_used: req_u256("gasUsed", raw.gas_used.as_ref())?,
        rewards: req_u256("rewards", raw.rewards.as_ref())?,
        tips: req_u256("tips", raw.tips.as_ref())?,
        transactions: req_u64("transactions", raw.transactions.as_ref())?,
    }))
}

/// `false` short-circuits before any field decoding. Each progress counter
/// decodes from its own field.
pub fn normalize_sync_status(raw: RawSyncStatus) -> Result<SyncStatus, NormalizeError> {
    match raw {
        RawSyncStatus::Flag(false) => Ok(SyncStatus::Synced),
        RawSyncStatus::Flag(true) => Err(NormalizeError::UnexpectedSyncFlag),
        RawSyncStatus::Progress(p) => Ok(SyncStatus::Syncing(SyncProgress {
            starting_block: req_u64("startingBlock", p.starting_block.as_ref())?,
            current_block: req_u64("currentBlock", p.current_block.as_ref())?,
            highest_block: req_u64("highestBlock", p.highest_block.as_ref())?,
            known_states: opt_u64("knownStates", p.known_states.as_ref())?,
            pulled_states: opt_u64("pulledStates", p.pulled_states.as_ref())?,
        })),
    }
}

pub fn normalize_totals(raw: RawTotals) -> Result<Totals, NormalizeError> {
    Ok(Totals {
        burned: req_u256("burned", raw.burned.as_ref())?,
        tipped: req_u256("tipped", raw.tipped.as_ref())?,
    })
}
