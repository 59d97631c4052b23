//! The time-series data model: datapoints, uniformly sampled series, series
//! consolidation, and the normalization kernel shared by all combining
//! functions.

pub use self::normalize::{Normalized, normalize};
pub use self::point::Datapoint;
pub use self::value::Value;

pub mod normalize;
pub mod point;
pub mod value;

/// How adjacent samples are merged when a series is consolidated
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConsolidationFunc {
	#[default]
	Average,
	Sum,
}

/// Presentation hints attached to a series by the special functions
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeriesOptions {
	pub color: Option<String>,
	pub line_width: Option<f64>,
	pub dashed: Option<f64>,
	pub second_y_axis: bool,
	pub draw_as_infinite: bool,
}

/// A named, uniformly sampled sequence of values over a half-open window.
///
/// The `i`-th value covers `[start + i * step, start + (i + 1) * step)`, and
/// `values.len() == ceil((end - start) / step)`. Missing samples are carried
/// as `None` and propagate through arithmetic unless a function explicitly
/// defines otherwise.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeSeries {
	/// The display name of this series
	pub name: String,
	/// The query fragment which produced this series
	pub path_expression: String,
	/// The start of the window, in seconds since the epoch
	pub start: i64,
	/// The end of the window, in seconds since the epoch
	pub end: i64,
	/// The sampling step, in seconds
	pub step: i64,
	/// The sampled values, one per step
	pub values: Vec<Option<f64>>,
	/// Presentation hints for the rendering layer
	pub options: SeriesOptions,
	/// How this series consolidates when resampled
	pub consolidation: ConsolidationFunc,
}

impl TimeSeries {
	/// Create a new series. The path expression defaults to the name.
	pub fn new(
		name: impl Into<String>,
		start: i64,
		end: i64,
		step: i64,
		values: Vec<Option<f64>>,
	) -> Self {
		let name = name.into();
		TimeSeries {
			path_expression: name.clone(),
			name,
			start,
			end,
			step,
			values,
			options: SeriesOptions::default(),
			consolidation: ConsolidationFunc::default(),
		}
	}

	/// The number of samples in this series
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Check whether this series holds no samples
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Consolidate this series by an integer factor.
	///
	/// Each run of `factor` adjacent samples is merged into one using the
	/// consolidation function, skipping absent values. A run with no present
	/// values becomes absent. A trailing partial run is dropped, and the end
	/// of the window is adjusted so that its width stays a multiple of the
	/// new step.
	pub fn consolidate(&mut self, factor: usize) {
		if factor <= 1 {
			return;
		}
		let merged = self
			.values
			.chunks_exact(factor)
			.map(|chunk| {
				let present = chunk.iter().flatten().copied().collect::<Vec<f64>>();
				match present.is_empty() {
					true => None,
					false => match self.consolidation {
						ConsolidationFunc::Average => {
							Some(present.iter().sum::<f64>() / present.len() as f64)
						}
						ConsolidationFunc::Sum => Some(present.iter().sum::<f64>()),
					},
				}
			})
			.collect::<Vec<_>>();
		self.step *= factor as i64;
		self.end = self.start + merged.len() as i64 * self.step;
		self.values = merged;
	}
}
