use std::time::Duration;

use alloy::primitives::Address;
use tracing::{error, info, instrument, warn};

use crate::chain::ChainSource;
use crate::checkpoint::CheckpointStore;
use crate::decode::decode;
use crate::directory::{resolve_directory, FeedContract};
use crate::error::IndexerError;
use crate::events::{EventKind, FeedEvent};
use crate::fetch::fetch_logs;
use crate::sink::EventSink;

/// Drives the resolve -> fetch -> decode -> persist -> advance cycle. One
/// instance, one thread: cycles run strictly one at a time, so the in-flight
/// checkpoint is never read and written concurrently.
pub struct Scheduler<C, K, S> {
    pub source: C,
    pub checkpoint: K,
    pub sink: S,
    pub registry: Address,
    pub rate_limit_delay: Duration,
}

impl<C, K, S> Scheduler<C, K, S>
where
    C: ChainSource,
    K: CheckpointStore,
    S: EventSink,
{
    pub fn new(
        source: C,
        checkpoint: K,
        sink: S,
        registry: Address,
        rate_limit_delay: Duration,
    ) -> Self {
        Self {
            source,
            checkpoint,
            sink,
            registry,
            rate_limit_delay,
        }
    }

    /// Run cycles forever, one per tick. Cycle errors are logged and retried
    /// at the next tick; there is no other teardown path than killing the
    /// process.
    pub fn run(&mut self, poll_interval: Duration) -> ! {
        loop {
            if let Err(e) = self.run_cycle() {
                error!(error = ?e, "cycle failed, retrying next tick");
            }
            std::thread::sleep(poll_interval);
        }
    }

    /// One polling cycle. The checkpoint only advances after every resolved
    /// contract has been attempted, and never when directory resolution or
    /// height retrieval failed.
    #[instrument(level = "info", skip_all, parent = None)]
    pub fn run_cycle(&mut self) -> Result<(), IndexerError> {
        let last = self.checkpoint.load()?;
        let current = self
            .source
            .latest_block()
            .map_err(IndexerError::HeightUnavailable)?;

        info!(checkpoint = last, head = current, "starting cycle");

        // effectively means the rpc was rolled back; the checkpoint must
        // never move backward, so sit the cycle out
        if current < last {
            warn!(
                checkpoint = last,
                head = current,
                "node is behind the checkpoint, skipping cycle"
            );
            return Ok(());
        }

        let feeds = resolve_directory(&self.source, self.registry)?;

        for (i, feed) in feeds.iter().enumerate() {
            if i > 0 {
                // spacing between per-contract query bursts, the node rate
                // limit is the constraint here, not throughput
                std::thread::sleep(self.rate_limit_delay);
            }
            self.process_feed(feed, last, current);
        }

        self.checkpoint.save(current)?;
        info!(block = current, "checkpoint advanced");

        Ok(())
    }

    // Fetch, decode and persist both event kinds for one feed. Failures stay
    // contained: a fetch error skips this feed for the cycle, decode and
    // insert errors drop the single event.
    fn process_feed(&mut self, feed: &FeedContract, from: u64, to: u64) {
        for kind in EventKind::ALL {
            let logs = match fetch_logs(&self.source, feed.address, kind, from, to) {
                Ok(logs) => logs,
                Err(e) => {
                    error!(
                        contract = %feed.address,
                        symbol = %feed.symbol,
                        ?kind,
                        error = ?e,
                        "log fetch failed, skipping contract for this cycle"
                    );
                    return;
                }
            };

            for log in logs {
                let event = match decode(kind, &feed.symbol, &log) {
                    Ok(event) => event,
                    Err(e) => {
                        warn!(
                            contract = %feed.address,
                            block = log.block_number,
                            error = ?e,
                            "dropping undecodable log"
                        );
                        continue;
                    }
                };

                let persisted = match &event {
                    FeedEvent::Revealed(ev) => self.sink.insert_revealed(ev),
                    FeedEvent::Finalized(ev) => self.sink.insert_finalized(ev),
                };
                if let Err(e) = persisted {
                    warn!(
                        contract = %feed.address,
                        symbol = %feed.symbol,
                        error = ?e,
                        "failed to persist event, continuing"
                    );
                }
            }
        }
    }
}
