use alloy::primitives::{B256, U256};
use alloy::rpc::types::Log;
use alloy::sol;
use alloy::sol_types::SolEvent;
use chrono::{DateTime, NaiveDateTime};

use crate::error::IndexerError;
use crate::events::{
    EventKind, FeedEvent, FinalizationType, PriceFinalizedEvent, PriceRevealedEvent,
};

sol! {
    event PriceRevealed(
        address indexed voter,
        uint256 indexed epochId,
        uint256 price,
        uint256 timestamp,
        uint256 votePowerNat,
        uint256 votePowerAsset
    );

    event PriceFinalized(
        uint256 indexed epochId,
        uint256 price,
        bool rewardedFtso,
        uint256 lowIQRRewardPrice,
        uint256 highIQRRewardPrice,
        uint256 lowElasticBandRewardPrice,
        uint256 highElasticBandRewardPrice,
        uint8 finalizationType,
        uint256 timestamp
    );
}

pub fn topic0(kind: EventKind) -> B256 {
    match kind {
        EventKind::PriceRevealed => PriceRevealed::SIGNATURE_HASH,
        EventKind::PriceFinalized => PriceFinalized::SIGNATURE_HASH,
    }
}

// all on-chain uints narrow to u64, values beyond that fail closed
fn to_u64(event: &'static str, field: &'static str, value: U256) -> Result<u64, IndexerError> {
    u64::try_from(value).map_err(|_| IndexerError::DecodeOverflow { event, field })
}

fn to_calendar(event: &'static str, unix_seconds: u64) -> Result<NaiveDateTime, IndexerError> {
    i64::try_from(unix_seconds)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.naive_utc())
        .ok_or(IndexerError::DecodeOverflow {
            event,
            field: "timestamp",
        })
}

/// Decode one raw log as the given event kind. Pure, no side effects; the
/// symbol comes from the emitting contract's identity, not the log itself.
pub fn decode(kind: EventKind, symbol: &str, log: &Log) -> Result<FeedEvent, IndexerError> {
    match kind {
        EventKind::PriceRevealed => decode_revealed(symbol, log).map(FeedEvent::Revealed),
        EventKind::PriceFinalized => decode_finalized(symbol, log).map(FeedEvent::Finalized),
    }
}

pub fn decode_revealed(symbol: &str, log: &Log) -> Result<PriceRevealedEvent, IndexerError> {
    const EVENT: &str = "PriceRevealed";

    let data = PriceRevealed::decode_log(&log.inner, true)
        .map_err(IndexerError::MalformedLog)?
        .data;

    Ok(PriceRevealedEvent {
        voter: data.voter.to_checksum(None),
        epoch_id: to_u64(EVENT, "epochId", data.epochId)?,
        price: to_u64(EVENT, "price", data.price)?,
        timestamp: to_calendar(EVENT, to_u64(EVENT, "timestamp", data.timestamp)?)?,
        vote_power_nat: to_u64(EVENT, "votePowerNat", data.votePowerNat)?,
        vote_power_asset: to_u64(EVENT, "votePowerAsset", data.votePowerAsset)?,
        symbol: symbol.to_owned(),
    })
}

pub fn decode_finalized(symbol: &str, log: &Log) -> Result<PriceFinalizedEvent, IndexerError> {
    const EVENT: &str = "PriceFinalized";

    let data = PriceFinalized::decode_log(&log.inner, true)
        .map_err(IndexerError::MalformedLog)?
        .data;

    Ok(PriceFinalizedEvent {
        epoch_id: to_u64(EVENT, "epochId", data.epochId)?,
        price: to_u64(EVENT, "price", data.price)?,
        rewarded_ftso: data.rewardedFtso,
        low_iqr_reward_price: to_u64(EVENT, "lowIQRRewardPrice", data.lowIQRRewardPrice)?,
        high_iqr_reward_price: to_u64(EVENT, "highIQRRewardPrice", data.highIQRRewardPrice)?,
        low_elastic_band_reward_price: to_u64(
            EVENT,
            "lowElasticBandRewardPrice",
            data.lowElasticBandRewardPrice,
        )?,
        high_elastic_band_reward_price: to_u64(
            EVENT,
            "highElasticBandRewardPrice",
            data.highElasticBandRewardPrice,
        )?,
        finalization_type: FinalizationType::from_code(data.finalizationType)?,
        timestamp: to_calendar(EVENT, to_u64(EVENT, "timestamp", data.timestamp)?)?,
        symbol: symbol.to_owned(),
    })
}
