// Shared helpers for decoder and scheduler tests: raw alloy Log builders plus
// in-memory fakes for the chain source, checkpoint store and event sink.

use std::cell::RefCell;
use std::collections::HashMap;

use alloy::primitives::{Address, LogData, B256, U256};
use alloy::rpc::types::Log;
use alloy::sol_types::SolValue;
use anyhow::{anyhow, bail, Result};
use ethp::keccak256;

use crate::chain::ChainSource;
use crate::checkpoint::CheckpointStore;
use crate::error::IndexerError;
use crate::events::{EventKind, PriceFinalizedEvent, PriceRevealedEvent};
use crate::sink::EventSink;

pub fn raw_log(contract: Address, block: u64, idx: u64, topics: Vec<B256>, data: Vec<u8>) -> Log {
    Log {
        block_hash: Some(keccak256!("some block").into()),
        block_number: Some(block),
        block_timestamp: None,
        log_index: Some(idx),
        transaction_hash: Some(keccak256!("some tx").into()),
        transaction_index: Some(0),
        removed: false,
        inner: alloy::primitives::Log {
            address: contract,
            data: LogData::new(topics, data.into()).unwrap(),
        },
    }
}

#[allow(clippy::too_many_arguments)]
pub fn revealed_log(
    contract: Address,
    block: u64,
    idx: u64,
    voter: Address,
    epoch_id: u64,
    price: u64,
    timestamp: u64,
    vote_power_nat: u64,
    vote_power_asset: u64,
) -> Log {
    raw_log(
        contract,
        block,
        idx,
        vec![
            crate::decode::topic0(EventKind::PriceRevealed),
            voter.into_word(),
            U256::from(epoch_id).into(),
        ],
        (
            U256::from(price),
            U256::from(timestamp),
            U256::from(vote_power_nat),
            U256::from(vote_power_asset),
        )
            .abi_encode(),
    )
}

#[allow(clippy::too_many_arguments)]
pub fn finalized_log(
    contract: Address,
    block: u64,
    idx: u64,
    epoch_id: u64,
    price: u64,
    rewarded_ftso: bool,
    low_iqr: u64,
    high_iqr: u64,
    low_elastic: u64,
    high_elastic: u64,
    finalization_type: u8,
    timestamp: u64,
) -> Log {
    raw_log(
        contract,
        block,
        idx,
        vec![
            crate::decode::topic0(EventKind::PriceFinalized),
            U256::from(epoch_id).into(),
        ],
        (
            U256::from(price),
            rewarded_ftso,
            U256::from(low_iqr),
            U256::from(high_iqr),
            U256::from(low_elastic),
            U256::from(high_elastic),
            // uint8 has no SolValue impl in this alloy version; a uint256 word
            // with the same value is byte-identical in non-packed ABI encoding.
            U256::from(finalization_type),
            U256::from(timestamp),
        )
            .abi_encode(),
    )
}

/// Scripted chain source. Feeds are (address, symbol) pairs, logs are keyed
/// by (contract, kind). The `log_calls` counter lets tests assert how often
/// the node was hit.
pub struct MockChain {
    pub registry: Address,
    pub manager: Address,
    pub height: u64,
    pub feeds: Vec<(Address, String)>,
    pub logs: HashMap<(Address, EventKind), Vec<Log>>,
    pub fail_manager: bool,
    pub fail_feed_list: bool,
    pub fail_symbol_for: Option<Address>,
    pub fail_logs_for: Option<Address>,
    pub log_calls: RefCell<u64>,
}

impl MockChain {
    pub fn new(height: u64) -> Self {
        Self {
            registry: Address::repeat_byte(0x01),
            manager: Address::repeat_byte(0x0a),
            height,
            feeds: Vec::new(),
            logs: HashMap::new(),
            fail_manager: false,
            fail_feed_list: false,
            fail_symbol_for: None,
            fail_logs_for: None,
            log_calls: RefCell::new(0),
        }
    }

    pub fn with_feed(mut self, address: &str, symbol: &str) -> Self {
        self.feeds.push((address.parse().unwrap(), symbol.to_owned()));
        self
    }

    pub fn with_log(mut self, contract: Address, kind: EventKind, log: Log) -> Self {
        self.logs.entry((contract, kind)).or_default().push(log);
        self
    }
}

impl ChainSource for MockChain {
    fn latest_block(&self) -> Result<u64> {
        Ok(self.height)
    }

    fn manager_address(&self, registry: Address) -> Result<Address> {
        if self.fail_manager {
            bail!("registry query failed");
        }
        assert_eq!(registry, self.registry);
        Ok(self.manager)
    }

    fn feed_addresses(&self, manager: Address) -> Result<Vec<Address>> {
        if self.fail_feed_list {
            bail!("feed list query failed");
        }
        assert_eq!(manager, self.manager);
        Ok(self.feeds.iter().map(|(address, _)| *address).collect())
    }

    fn feed_symbol(&self, feed: Address) -> Result<String> {
        if self.fail_symbol_for == Some(feed) {
            bail!("symbol query failed");
        }
        self.feeds
            .iter()
            .find(|(address, _)| *address == feed)
            .map(|(_, symbol)| symbol.clone())
            .ok_or_else(|| anyhow!("unknown feed {feed}"))
    }

    fn logs(&self, contract: Address, kind: EventKind, from: u64, to: u64) -> Result<Vec<Log>> {
        *self.log_calls.borrow_mut() += 1;
        if self.fail_logs_for == Some(contract) {
            bail!("node refused the log query");
        }
        Ok(self
            .logs
            .get(&(contract, kind))
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|log| {
                log.block_number
                    .is_some_and(|block| block >= from && block <= to)
            })
            .collect())
    }
}

pub struct MemoryCheckpoint {
    pub block: u64,
    pub saves: u64,
}

impl MemoryCheckpoint {
    pub fn new(block: u64) -> Self {
        Self { block, saves: 0 }
    }
}

impl CheckpointStore for MemoryCheckpoint {
    fn load(&self) -> Result<u64, IndexerError> {
        Ok(self.block)
    }

    fn save(&mut self, block: u64) -> Result<(), IndexerError> {
        self.block = block;
        self.saves += 1;
        Ok(())
    }
}

/// Collects inserts in memory; can be told to reject events of one symbol.
#[derive(Default)]
pub struct MemorySink {
    pub revealed: Vec<PriceRevealedEvent>,
    pub finalized: Vec<PriceFinalizedEvent>,
    pub fail_for_symbol: Option<String>,
}

impl MemorySink {
    fn rejects(&self, symbol: &str) -> bool {
        self.fail_for_symbol.as_deref() == Some(symbol)
    }
}

impl EventSink for MemorySink {
    fn insert_revealed(&mut self, event: &PriceRevealedEvent) -> Result<(), IndexerError> {
        if self.rejects(&event.symbol) {
            return Err(IndexerError::Persistence(anyhow!("injected insert failure")));
        }
        self.revealed.push(event.clone());
        Ok(())
    }

    fn insert_finalized(&mut self, event: &PriceFinalizedEvent) -> Result<(), IndexerError> {
        if self.rejects(&event.symbol) {
            return Err(IndexerError::Persistence(anyhow!("injected insert failure")));
        }
        self.finalized.push(event.clone());
        Ok(())
    }
}
