use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use serde::Deserialize;
use tracing::error;

use crate::models::{PriceFinalizedRow, PriceRevealedRow};
use crate::schema::{price_finalized, price_revealed};

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Common filter set of both read endpoints, camelCase to match the wire
/// shape clients already use.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpochRangeQuery {
    pub symbol: String,
    pub start_epoch_id: i64,
    pub end_epoch_id: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    100
}

pub fn router(pool: PgPool) -> Router {
    Router::new()
        .route("/prices-for-symbol", get(prices_for_symbol))
        .route("/votes-of/:voter", get(votes_of))
        .with_state(pool)
}

/// Finalized prices for a symbol over an epoch range, epoch ascending.
async fn prices_for_symbol(
    State(pool): State<PgPool>,
    Query(query): Query<EpochRangeQuery>,
) -> Result<Json<Vec<PriceFinalizedRow>>, StatusCode> {
    run_query(move || {
        let mut conn = pool.get()?;
        Ok(price_finalized::table
            .filter(price_finalized::symbol.eq(&query.symbol))
            .filter(price_finalized::epoch_id.between(query.start_epoch_id, query.end_epoch_id))
            .order(price_finalized::epoch_id.asc())
            .limit(query.limit)
            .offset(query.offset)
            .select(PriceFinalizedRow::as_select())
            .load(&mut conn)?)
    })
    .await
}

/// One voter's reveals for a symbol over an epoch range, epoch ascending.
async fn votes_of(
    State(pool): State<PgPool>,
    Path(voter): Path<String>,
    Query(query): Query<EpochRangeQuery>,
) -> Result<Json<Vec<PriceRevealedRow>>, StatusCode> {
    run_query(move || {
        let mut conn = pool.get()?;
        Ok(price_revealed::table
            .filter(price_revealed::voter.eq(&voter))
            .filter(price_revealed::symbol.eq(&query.symbol))
            .filter(price_revealed::epoch_id.between(query.start_epoch_id, query.end_epoch_id))
            .order(price_revealed::epoch_id.asc())
            .limit(query.limit)
            .offset(query.offset)
            .select(PriceRevealedRow::as_select())
            .load(&mut conn)?)
    })
    .await
}

// diesel is synchronous, so queries run on the blocking pool
async fn run_query<T>(
    query: impl FnOnce() -> anyhow::Result<Vec<T>> + Send + 'static,
) -> Result<Json<Vec<T>>, StatusCode>
where
    T: Send + 'static,
{
    tokio::task::spawn_blocking(query)
        .await
        .map_err(|e| {
            error!(error = ?e, "query task panicked");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map(Json)
        .map_err(|e| {
            error!(error = ?e, "query failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
