use serde::{Deserialize, Serialize};

/// A single received measurement for a metric.
///
/// Timestamps travel the wire as floating point seconds, exactly as they are
/// received, and are only anchored to an integer grid once a series is built
/// for a query window.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Datapoint {
	pub timestamp: f64,
	pub value: f64,
}

impl Datapoint {
	/// Create a new datapoint
	pub fn new(timestamp: f64, value: f64) -> Self {
		Datapoint {
			timestamp,
			value,
		}
	}

	/// Check whether the value of this datapoint is absent.
	///
	/// Absent values are carried as NaN, which is never equal to itself.
	pub fn is_absent(&self) -> bool {
		self.value != self.value
	}
}

impl From<(f64, f64)> for Datapoint {
	fn from((timestamp, value): (f64, f64)) -> Self {
		Datapoint::new(timestamp, value)
	}
}

impl From<Datapoint> for (f64, f64) {
	fn from(point: Datapoint) -> Self {
		(point.timestamp, point.value)
	}
}
