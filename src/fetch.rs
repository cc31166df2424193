use alloy::primitives::Address;
use alloy::rpc::types::eth::Log;

use crate::chain::ChainSource;
use crate::error::IndexerError;
use crate::events::EventKind;

/// Fetch logs of one kind for one contract over the inclusive range
/// `[from, to]`. Order is as delivered by the node; no re-sort here.
pub fn fetch_logs(
    source: &impl ChainSource,
    contract: Address,
    kind: EventKind,
    from: u64,
    to: u64,
) -> Result<Vec<Log>, IndexerError> {
    // checkpoint already at or beyond the head, nothing to fetch
    if from > to {
        return Ok(Vec::new());
    }

    source
        .logs(contract, kind, from, to)
        .map_err(|source| IndexerError::FetchFailed { contract, source })
}
