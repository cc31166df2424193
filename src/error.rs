use alloy::primitives::Address;
use thiserror::Error;

/// Failure taxonomy of the ingestion pipeline. The scheduler decides per
/// variant whether a failure skips the cycle, the contract, or just the
/// offending event.
#[derive(Debug, Error)]
pub enum IndexerError {
    /// Registry, manager or feed-list query failed. The cycle must not run
    /// against a stale or partial contract set.
    #[error("contract directory unavailable")]
    DirectoryUnavailable(#[source] anyhow::Error),

    /// Current block height could not be read; the cycle cannot compute its
    /// range and is skipped.
    #[error("failed to fetch current block height")]
    HeightUnavailable(#[source] anyhow::Error),

    /// Log query failed for one feed contract.
    #[error("log fetch failed for contract {contract}")]
    FetchFailed {
        contract: Address,
        #[source]
        source: anyhow::Error,
    },

    /// A numeric event argument does not fit the column width we commit to.
    /// No truncation, the event is a defined decode failure.
    #[error("{event}.{field} exceeds u64")]
    DecodeOverflow {
        event: &'static str,
        field: &'static str,
    },

    /// Log data did not ABI-decode as the expected event.
    #[error("malformed log")]
    MalformedLog(#[source] alloy::sol_types::Error),

    #[error("unknown finalization type code {0}")]
    UnknownFinalizationType(u8),

    #[error("checkpoint store failure")]
    Checkpoint(#[source] anyhow::Error),

    /// Event insert failed. Non-fatal, the event is lost for this attempt.
    #[error("persistence failure")]
    Persistence(#[source] anyhow::Error),
}
