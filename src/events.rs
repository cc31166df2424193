use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::IndexerError;

/// The two event kinds emitted by a feed contract that we ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PriceRevealed,
    PriceFinalized,
}

impl EventKind {
    pub const ALL: [EventKind; 2] = [EventKind::PriceRevealed, EventKind::PriceFinalized];
}

/// One voter's price reveal for an epoch, as decoded from the log plus the
/// symbol of the contract that emitted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceRevealedEvent {
    pub voter: String,
    pub epoch_id: u64,
    // fixed-point, no scaling applied at this layer
    pub price: u64,
    pub timestamp: NaiveDateTime,
    pub vote_power_nat: u64,
    pub vote_power_asset: u64,
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceFinalizedEvent {
    pub epoch_id: u64,
    pub price: u64,
    pub rewarded_ftso: bool,
    pub low_iqr_reward_price: u64,
    pub high_iqr_reward_price: u64,
    pub low_elastic_band_reward_price: u64,
    pub high_elastic_band_reward_price: u64,
    pub finalization_type: FinalizationType,
    pub timestamp: NaiveDateTime,
    pub symbol: String,
}

/// A decoded event of either kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    Revealed(PriceRevealedEvent),
    Finalized(PriceFinalizedEvent),
}

/// How an epoch price got finalized, per the on-chain enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FinalizationType {
    NotFinalized,
    WeightedMedian,
    TrustedAddresses,
    PreviousPriceCopied,
    TrustedAddressesException,
    PreviousPriceCopiedException,
}

impl FinalizationType {
    pub const fn as_db_str(self) -> &'static str {
        match self {
            FinalizationType::NotFinalized => "NOT_FINALIZED",
            FinalizationType::WeightedMedian => "WEIGHTED_MEDIAN",
            FinalizationType::TrustedAddresses => "TRUSTED_ADDRESSES",
            FinalizationType::PreviousPriceCopied => "PREVIOUS_PRICE_COPIED",
            FinalizationType::TrustedAddressesException => "TRUSTED_ADDRESSES_EXCEPTION",
            FinalizationType::PreviousPriceCopiedException => "PREVIOUS_PRICE_COPIED_EXCEPTION",
        }
    }

    pub fn from_code(code: u8) -> Result<Self, IndexerError> {
        match code {
            0 => Ok(FinalizationType::NotFinalized),
            1 => Ok(FinalizationType::WeightedMedian),
            2 => Ok(FinalizationType::TrustedAddresses),
            3 => Ok(FinalizationType::PreviousPriceCopied),
            4 => Ok(FinalizationType::TrustedAddressesException),
            5 => Ok(FinalizationType::PreviousPriceCopiedException),
            other => Err(IndexerError::UnknownFinalizationType(other)),
        }
    }
}
