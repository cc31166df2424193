use alloy::primitives::Address;
use anyhow::Context;
use tracing::{info, instrument};

use crate::chain::ChainSource;
use crate::error::IndexerError;

/// One monitored feed contract. Rebuilt every cycle, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedContract {
    pub address: Address,
    pub symbol: String,
}

/// Walk registry -> manager -> feed list and read each feed's symbol. Any
/// step failing aborts the whole resolution; the caller must not fall back
/// to a previous cycle's list.
#[instrument(level = "info", skip_all, fields(%registry))]
pub fn resolve_directory(
    source: &impl ChainSource,
    registry: Address,
) -> Result<Vec<FeedContract>, IndexerError> {
    resolve(source, registry).map_err(IndexerError::DirectoryUnavailable)
}

fn resolve(source: &impl ChainSource, registry: Address) -> anyhow::Result<Vec<FeedContract>> {
    let manager = source
        .manager_address(registry)
        .context("failed to query manager address from registry")?;

    let addresses = source
        .feed_addresses(manager)
        .context("failed to query feed list from manager")?;

    let feeds = addresses
        .into_iter()
        .map(|address| {
            let symbol = source
                .feed_symbol(address)
                .with_context(|| format!("failed to query symbol of feed {address}"))?;
            Ok(FeedContract { address, symbol })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    info!(%manager, feeds = feeds.len(), "resolved contract directory");

    Ok(feeds)
}
