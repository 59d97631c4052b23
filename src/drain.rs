//! The drain side of the cache: a worker which hands pending datapoints to
//! the persister, and the periodic instrumentation recorder.

use crate::net::Ingest;
use pyrite_core::cache::Persist;
use pyrite_core::cnf::RECORD_INTERVAL;
use pyrite_core::err::Error;
use pyrite_core::obs;
use pyrite_core::series::Datapoint;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A persister which only logs what it is handed. The real time-series
/// storage engine attaches here; the pipeline makes no durability promises
/// before it acknowledges a drain.
pub struct LogPersister;

impl Persist for LogPersister {
	fn persist(&self, metric: &str, points: &[Datapoint]) -> Result<(), Error> {
		debug!("Persisting {} datapoints for {metric}", points.len());
		Ok(())
	}
}

/// Drain the cache into the persister until the task is aborted.
///
/// The metric with the most pending datapoints is drained first. After each
/// drain the pause switch is re-checked, so a full cache that caused a pause
/// resumes its clients once enough has been written out.
pub async fn run(ingest: Arc<Ingest>, persister: Arc<dyn Persist>) {
	loop {
		match ingest.cache.pop_largest() {
			Some((metric, points)) => {
				match persister.persist(&metric, &points) {
					Ok(()) => {
						ingest
							.counters
							.increment_by(obs::COMMITTED_POINTS, points.len() as i64);
					}
					Err(error) => {
						error!("Failed to persist {} datapoints for {metric}: {error}", points.len());
					}
				}
				ingest.maybe_resume();
				// Stay cooperative on a busy cache
				tokio::task::yield_now().await;
			}
			None => {
				ingest.maybe_resume();
				tokio::time::sleep(Duration::from_millis(100)).await;
			}
		}
	}
}

/// Drain everything still pending into the persister, synchronously. Used
/// on shutdown after the listeners have stopped.
pub fn flush(ingest: &Ingest, persister: &dyn Persist) {
	while let Some((metric, points)) = ingest.cache.pop_largest() {
		if let Err(error) = persister.persist(&metric, &points) {
			error!("Failed to persist {} datapoints for {metric}: {error}", points.len());
		}
	}
}

/// Periodically drain the instrumentation counters into the cache
pub async fn record(ingest: Arc<Ingest>) {
	let mut interval = tokio::time::interval(Duration::from_secs(*RECORD_INTERVAL));
	// The first tick completes immediately; nothing to record yet
	interval.tick().await;
	loop {
		interval.tick().await;
		let now = match SystemTime::now().duration_since(UNIX_EPOCH) {
			Ok(now) => now.as_secs_f64(),
			Err(_) => continue,
		};
		obs::record(&ingest.counters, &ingest.cache, now);
	}
}
