//! The process-wide write-back buffer between the ingest listeners, the
//! query handler, and the persister.

use crate::err::Error;
use crate::series::Datapoint;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// The seam through which pending datapoints leave the cache.
///
/// The on-disk format and its writer live outside this crate. The drain
/// worker pops one metric at a time and hands the points to an
/// implementation of this trait; a failed persist is logged by the caller
/// and never unwinds into the ingest path.
pub trait Persist: Send + Sync {
	/// Write the pending datapoints for a single metric
	fn persist(&self, metric: &str, points: &[Datapoint]) -> Result<(), Error>;
}

/// An ordered map from metric name to its pending datapoints.
///
/// Writers append, readers snapshot, and a single drainer removes whole
/// metrics at a time. Datapoints for one metric keep their arrival order all
/// the way to the drainer; ordering across metrics is unspecified.
#[derive(Default)]
pub struct MetricCache {
	/// The pending datapoints, keyed by metric name
	inner: RwLock<BTreeMap<String, Vec<Datapoint>>>,
	/// The total number of pending datapoints across all metrics
	size: AtomicUsize,
}

impl MetricCache {
	/// Create a new empty cache
	pub fn new() -> Self {
		MetricCache::default()
	}

	/// Append a datapoint to the pending list for a metric
	pub fn store(&self, metric: &str, point: Datapoint) {
		let mut inner = self.inner.write();
		match inner.get_mut(metric) {
			Some(points) => points.push(point),
			None => {
				inner.insert(metric.to_owned(), vec![point]);
			}
		}
		self.size.fetch_add(1, Ordering::Relaxed);
	}

	/// Snapshot the pending datapoints for a metric.
	///
	/// Returns an empty list for an unknown metric. The returned list is a
	/// copy and is never mutated out from under the caller.
	pub fn get(&self, metric: &str) -> Vec<Datapoint> {
		self.inner.read().get(metric).cloned().unwrap_or_default()
	}

	/// Atomically drain the pending datapoints for one metric
	pub fn pop(&self, metric: &str) -> Option<Vec<Datapoint>> {
		let points = self.inner.write().remove(metric)?;
		self.size.fetch_sub(points.len(), Ordering::Relaxed);
		trace!("Drained {} datapoints for {metric}", points.len());
		Some(points)
	}

	/// Atomically drain the metric with the most pending datapoints
	pub fn pop_largest(&self) -> Option<(String, Vec<Datapoint>)> {
		let mut inner = self.inner.write();
		let metric = inner
			.iter()
			.max_by_key(|(_, points)| points.len())
			.map(|(metric, _)| metric.clone())?;
		let points = inner.remove(&metric)?;
		drop(inner);
		self.size.fetch_sub(points.len(), Ordering::Relaxed);
		trace!("Drained {} datapoints for {metric}", points.len());
		Some((metric, points))
	}

	/// The total number of pending datapoints across all metrics
	pub fn size(&self) -> usize {
		self.size.load(Ordering::Relaxed)
	}

	/// The number of metrics with pending datapoints
	pub fn metrics(&self) -> usize {
		self.inner.read().len()
	}

	/// Check whether the cache holds no pending datapoints
	pub fn is_empty(&self) -> bool {
		self.size() == 0
	}

	/// Discard every pending datapoint
	pub fn reset(&self) {
		let mut inner = self.inner.write();
		inner.clear();
		self.size.store(0, Ordering::Relaxed);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stores_preserve_arrival_order() {
		let cache = MetricCache::new();
		cache.store("cpu.load", Datapoint::new(1.0, 0.5));
		cache.store("cpu.load", Datapoint::new(2.0, 0.7));
		cache.store("mem.free", Datapoint::new(1.0, 100.0));
		assert_eq!(cache.size(), 3);
		assert_eq!(cache.get("cpu.load"), vec![
			Datapoint::new(1.0, 0.5),
			Datapoint::new(2.0, 0.7),
		]);
	}

	#[test]
	fn unknown_metrics_are_empty() {
		let cache = MetricCache::new();
		assert!(cache.get("no.such.metric").is_empty());
		assert!(cache.pop("no.such.metric").is_none());
	}

	#[test]
	fn reads_do_not_drain() {
		let cache = MetricCache::new();
		cache.store("cpu.load", Datapoint::new(1.0, 0.5));
		let _ = cache.get("cpu.load");
		assert_eq!(cache.size(), 1);
	}

	#[test]
	fn pop_drains_one_metric() {
		let cache = MetricCache::new();
		cache.store("cpu.load", Datapoint::new(1.0, 0.5));
		cache.store("mem.free", Datapoint::new(1.0, 100.0));
		let points = cache.pop("cpu.load").expect("metric was pending");
		assert_eq!(points.len(), 1);
		assert_eq!(cache.size(), 1);
		assert!(cache.get("cpu.load").is_empty());
	}

	#[test]
	fn reset_discards_everything() {
		let cache = MetricCache::new();
		cache.store("a", Datapoint::new(1.0, 1.0));
		cache.store("b", Datapoint::new(1.0, 1.0));
		cache.reset();
		assert!(cache.is_empty());
		assert_eq!(cache.metrics(), 0);
	}

	#[test]
	fn pop_largest_prefers_the_longest_queue() {
		let cache = MetricCache::new();
		cache.store("a", Datapoint::new(1.0, 1.0));
		cache.store("b", Datapoint::new(1.0, 1.0));
		cache.store("b", Datapoint::new(2.0, 2.0));
		let (metric, points) = cache.pop_largest().expect("cache was not empty");
		assert_eq!(metric, "b");
		assert_eq!(points.len(), 2);
		assert_eq!(cache.size(), 1);
	}

	#[test_log::test]
	fn concurrent_stores_are_all_counted() {
		let cache = std::sync::Arc::new(MetricCache::new());
		let handles = (0..8)
			.map(|i| {
				let cache = cache.clone();
				std::thread::spawn(move || {
					for n in 0..100 {
						cache.store("shared.metric", Datapoint::new(n as f64, i as f64));
					}
				})
			})
			.collect::<Vec<_>>();
		for handle in handles {
			handle.join().expect("writer thread panicked");
		}
		assert_eq!(cache.size(), 800);
		assert_eq!(cache.get("shared.metric").len(), 800);
	}
}
