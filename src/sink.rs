use anyhow::Context;
use diesel::ExpressionMethods;
use diesel::PgConnection;
use diesel::RunQueryDsl;
use tracing::{info, instrument};

use crate::error::IndexerError;
use crate::events::{PriceFinalizedEvent, PriceRevealedEvent};
use crate::schema::{price_finalized, price_revealed};

/// Where decoded events land. Inserts are attempted once per event; the
/// scheduler treats failures as non-fatal.
pub trait EventSink {
    fn insert_revealed(&mut self, event: &PriceRevealedEvent) -> Result<(), IndexerError>;
    fn insert_finalized(&mut self, event: &PriceFinalizedEvent) -> Result<(), IndexerError>;
}

pub struct DieselSink {
    pub conn: PgConnection,
}

impl EventSink for DieselSink {
    #[instrument(level = "info", skip_all, fields(epoch = event.epoch_id, symbol = %event.symbol))]
    fn insert_revealed(&mut self, event: &PriceRevealedEvent) -> Result<(), IndexerError> {
        diesel::insert_into(price_revealed::table)
            .values((
                price_revealed::voter.eq(&event.voter),
                price_revealed::epoch_id.eq(event.epoch_id as i64),
                price_revealed::price.eq(event.price as i64),
                price_revealed::vote_power_nat.eq(event.vote_power_nat as i64),
                price_revealed::vote_power_asset.eq(event.vote_power_asset as i64),
                price_revealed::symbol.eq(&event.symbol),
                price_revealed::timestamp.eq(event.timestamp),
            ))
            .execute(&mut self.conn)
            .context("failed to insert price reveal")
            .map_err(IndexerError::Persistence)?;

        info!(voter = %event.voter, "price reveal stored");

        Ok(())
    }

    #[instrument(level = "info", skip_all, fields(epoch = event.epoch_id, symbol = %event.symbol))]
    fn insert_finalized(&mut self, event: &PriceFinalizedEvent) -> Result<(), IndexerError> {
        diesel::insert_into(price_finalized::table)
            .values((
                price_finalized::epoch_id.eq(event.epoch_id as i64),
                price_finalized::price.eq(event.price as i64),
                price_finalized::rewarded_ftso.eq(event.rewarded_ftso),
                price_finalized::low_iqr_reward_price.eq(event.low_iqr_reward_price as i64),
                price_finalized::high_iqr_reward_price.eq(event.high_iqr_reward_price as i64),
                price_finalized::low_elastic_band_reward_price
                    .eq(event.low_elastic_band_reward_price as i64),
                price_finalized::high_elastic_band_reward_price
                    .eq(event.high_elastic_band_reward_price as i64),
                price_finalized::finalization_type.eq(event.finalization_type.as_db_str()),
                price_finalized::symbol.eq(&event.symbol),
                price_finalized::timestamp.eq(event.timestamp),
            ))
            .execute(&mut self.conn)
            .context("failed to insert finalized price")
            .map_err(IndexerError::Persistence)?;

        info!(price = event.price, "finalized price stored");

        Ok(())
    }
}
