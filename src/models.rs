use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

/// Persisted reveal row as served by the read API.
#[derive(Debug, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::price_revealed)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct PriceRevealedRow {
    pub id: i64,
    pub voter: String,
    pub epoch_id: i64,
    pub price: i64,
    pub vote_power_nat: i64,
    pub vote_power_asset: i64,
    pub symbol: String,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::price_finalized)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct PriceFinalizedRow {
    pub id: i64,
    pub epoch_id: i64,
    pub price: i64,
    pub rewarded_ftso: bool,
    pub low_iqr_reward_price: i64,
    pub high_iqr_reward_price: i64,
    pub low_elastic_band_reward_price: i64,
    pub high_elastic_band_reward_price: i64,
    pub finalization_type: String,
    pub symbol: String,
    pub timestamp: NaiveDateTime,
}
