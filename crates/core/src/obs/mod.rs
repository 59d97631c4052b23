//! Instrumentation counters incremented by the ingest and query paths, and
//! their periodic drain into the metric cache so that the pipeline measures
//! itself.

use crate::cache::MetricCache;
use crate::cnf::RECORD_INSTANCE;
use crate::series::Datapoint;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

/// Datapoints successfully parsed or decoded by any listener
pub const METRICS_RECEIVED: &str = "metricsReceived";

/// Requests served by the cache query handler
pub const CACHE_QUERIES: &str = "cacheQueries";

/// Datapoints handed to the persister by the drain worker
pub const COMMITTED_POINTS: &str = "committedPoints";

/// A table of named monotonic counters.
///
/// Increments are atomic per counter; a snapshot is atomic per counter but
/// not across the table.
#[derive(Default)]
pub struct Counters(DashMap<String, AtomicI64>);

impl Counters {
	/// Create a new empty counter table
	pub fn new() -> Self {
		Counters::default()
	}

	/// Increment a counter by one
	pub fn increment(&self, name: &str) {
		self.increment_by(name, 1);
	}

	/// Increment a counter by an arbitrary amount
	pub fn increment_by(&self, name: &str, delta: i64) {
		match self.0.get(name) {
			Some(counter) => {
				counter.fetch_add(delta, Ordering::Relaxed);
			}
			None => {
				self.0
					.entry(name.to_owned())
					.or_default()
					.fetch_add(delta, Ordering::Relaxed);
			}
		}
	}

	/// The current value of a counter
	pub fn value(&self, name: &str) -> i64 {
		self.0.get(name).map(|c| c.load(Ordering::Relaxed)).unwrap_or_default()
	}

	/// A non-destructive snapshot of every counter
	pub fn snapshot(&self) -> BTreeMap<String, i64> {
		self.0
			.iter()
			.map(|entry| (entry.key().clone(), entry.value().load(Ordering::Relaxed)))
			.collect()
	}

	/// Snapshot every counter and reset each one to zero
	pub fn drain(&self) -> BTreeMap<String, i64> {
		self.0
			.iter()
			.map(|entry| (entry.key().clone(), entry.value().swap(0, Ordering::Relaxed)))
			.collect()
	}
}

/// Drain every counter into the cache as self-instrumentation datapoints.
///
/// Each counter value is stored under `pyrite.agents.<instance>.<counter>`,
/// along with the current cache occupancy, stamped with the given timestamp.
pub fn record(counters: &Counters, cache: &MetricCache, timestamp: f64) {
	let instance = &*RECORD_INSTANCE;
	for (name, value) in counters.drain() {
		let metric = format!("pyrite.agents.{instance}.{name}");
		cache.store(&metric, Datapoint::new(timestamp, value as f64));
	}
	let size = cache.size();
	debug!("Recorded instrumentation counters ({size} datapoints pending)");
	cache.store(
		&format!("pyrite.agents.{instance}.cache.size"),
		Datapoint::new(timestamp, size as f64),
	);
	cache.store(
		&format!("pyrite.agents.{instance}.cache.metrics"),
		Datapoint::new(timestamp, cache.metrics() as f64),
	);
}
