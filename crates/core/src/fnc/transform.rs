use crate::ctx::Context;
use crate::err::Error;
use crate::fnc::util::parse_interval;
use crate::series::{TimeSeries, Value};

/// Multiply every value by a constant factor
pub fn scale((mut series, factor): (Vec<TimeSeries>, f64)) -> Result<Value, Error> {
	for s in series.iter_mut() {
		s.name = format!("scale({},{factor:.1})", s.name);
		for value in s.values.iter_mut() {
			*value = value.map(|v| v * factor);
		}
	}
	Ok(series.into())
}

/// Add a constant to every value
pub fn offset((mut series, amount): (Vec<TimeSeries>, f64)) -> Result<Value, Error> {
	for s in series.iter_mut() {
		s.name = format!("offset({},{amount:.1})", s.name);
		for value in s.values.iter_mut() {
			*value = value.map(|v| v + amount);
		}
	}
	Ok(series.into())
}

/// The slot-to-slot change of each series. The first slot, and any slot
/// whose neighbour is absent, is absent.
pub fn derivative((series,): (Vec<TimeSeries>,)) -> Result<Value, Error> {
	let mut results = Vec::with_capacity(series.len());
	for s in series {
		let mut prev = None;
		let values = s
			.values
			.iter()
			.map(|&value| {
				let out = match (prev, value) {
					(Some(p), Some(v)) => Some(v - p),
					_ => None,
				};
				prev = value;
				out
			})
			.collect();
		let name = format!("derivative({})", s.name);
		results.push(TimeSeries::new(name, s.start, s.end, s.step, values));
	}
	Ok(results.into())
}

/// The running sum of each series from the start of its window. Absent
/// values stay absent and do not advance the sum.
pub fn integral((series,): (Vec<TimeSeries>,)) -> Result<Value, Error> {
	let mut results = Vec::with_capacity(series.len());
	for s in series {
		let mut current = 0.0;
		let values = s
			.values
			.iter()
			.map(|&value| {
				value.map(|v| {
					current += v;
					current
				})
			})
			.collect();
		let name = format!("integral({})", s.name);
		results.push(TimeSeries::new(name, s.start, s.end, s.step, values));
	}
	Ok(results.into())
}

/// Like `derivative`, but a drop is treated as a counter wrap when a
/// maximum counter value is given, and absent otherwise
pub fn non_negative_derivative(
	(series, max_value): (Vec<TimeSeries>, Option<f64>),
) -> Result<Value, Error> {
	let mut results = Vec::with_capacity(series.len());
	for s in series {
		let mut prev: Option<f64> = None;
		let values = s
			.values
			.iter()
			.map(|&value| {
				let out = match (prev, value) {
					(Some(p), Some(v)) if v >= p => Some(v - p),
					(Some(p), Some(v)) => match max_value {
						Some(max) if max >= v => Some((max - p) + v + 1.0),
						_ => None,
					},
					_ => None,
				};
				prev = value;
				out
			})
			.collect();
		let name = format!("nonNegativeDerivative({})", s.name);
		results.push(TimeSeries::new(name, s.start, s.end, s.step, values));
	}
	Ok(results.into())
}

/// The logarithm of each value in the given base, defaulting to base 10.
/// Non-positive values are absent.
pub fn log((series, base): (Vec<TimeSeries>, Option<f64>)) -> Result<Value, Error> {
	let base = base.unwrap_or(10.0);
	let mut results = Vec::with_capacity(series.len());
	for s in series {
		let values = s
			.values
			.iter()
			.map(|&value| match value {
				Some(v) if v > 0.0 => Some(v.log(base)),
				_ => None,
			})
			.collect();
		let name = format!("log({}, {base})", s.name);
		results.push(TimeSeries::new(name, s.start, s.end, s.step, values));
	}
	Ok(results.into())
}

/// Continue each series through gaps with the last present value. A leading
/// gap stays absent.
pub fn keep_last_value((mut series,): (Vec<TimeSeries>,)) -> Result<Value, Error> {
	for s in series.iter_mut() {
		s.name = format!("keepLastValue({})", s.name);
		for i in 1..s.values.len() {
			if s.values[i].is_none() {
				s.values[i] = s.values[i - 1];
			}
		}
	}
	Ok(series.into())
}

/// Re-evaluate the expression which produced a series over a window shifted
/// back by the given offset, relabelled onto the original window
pub fn time_shift(
	ctx: &Context,
	(series, offset): (Vec<TimeSeries>, String),
) -> Result<Value, Error> {
	let delta = parse_interval("timeShift", &offset)?;
	// Every series in the list shares the path expression which produced it
	let Some(first) = series.first() else {
		return Ok(Value::Series(Vec::new()));
	};
	let mut results = Vec::new();
	for mut shifted in ctx.shifted(delta).evaluate(&first.path_expression)? {
		shifted.name = format!("timeShift({}, {offset})", shifted.name);
		shifted.start = first.start;
		shifted.end = first.end;
		results.push(shifted);
	}
	Ok(results.into())
}

/// Re-bucket each series into intervals anchored at its start, summing the
/// present values in each bucket
pub fn summarize((series, interval): (Vec<TimeSeries>, String)) -> Result<Value, Error> {
	let width = parse_interval("summarize", &interval)?;
	if width <= 0 {
		return Err(Error::InvalidArguments {
			name: String::from("summarize"),
			message: String::from("The bucket interval must be larger than zero seconds."),
		});
	}
	let mut results = Vec::with_capacity(series.len());
	for s in series {
		let span = (s.end - s.start).max(0);
		let count = (span + width - 1).div_euclid(width);
		let mut buckets: Vec<Option<f64>> = vec![None; count as usize];
		for (i, value) in s.values.iter().enumerate() {
			let Some(v) = value else { continue };
			let timestamp = s.start + i as i64 * s.step;
			let index = (timestamp - s.start).div_euclid(width);
			if let Some(bucket) = buckets.get_mut(index as usize) {
				*bucket = Some(bucket.unwrap_or(0.0) + v);
			}
		}
		let name = format!("summarize({}, \"{interval}\")", s.name);
		let end = s.start + count * width;
		results.push(TimeSeries::new(name, s.start, end, width, buckets));
	}
	Ok(results.into())
}

/// Estimate hit counts per interval from per-second rates.
///
/// Each sample's mass `value * step` is spread proportionally over the
/// buckets it overlaps. Buckets are anchored so that the last one ends at
/// the series end; a sample falling before the anchored window is dropped.
pub fn hitcount((series, interval): (Vec<TimeSeries>, String)) -> Result<Value, Error> {
	let width = parse_interval("hitcount", &interval)?;
	if width <= 0 {
		return Err(Error::InvalidArguments {
			name: String::from("hitcount"),
			message: String::from("The bucket interval must be larger than zero seconds."),
		});
	}
	let mut results = Vec::with_capacity(series.len());
	for s in series {
		let span = (s.end - s.start).max(0);
		let count = (span + width - 1).div_euclid(width);
		let new_start = s.end - count * width;
		let mut buckets: Vec<Option<f64>> = vec![None; count as usize];
		let mut add = |index: i64, amount: f64| {
			if index >= 0 {
				if let Some(bucket) = buckets.get_mut(index as usize) {
					*bucket = Some(bucket.unwrap_or(0.0) + amount);
				}
			}
		};
		for (i, value) in s.values.iter().enumerate() {
			let Some(v) = value else { continue };
			let start_time = s.start + i as i64 * s.step;
			let start_bucket = (start_time - new_start).div_euclid(width);
			let start_mod = (start_time - new_start).rem_euclid(width);
			let end_time = start_time + s.step;
			let mut end_bucket = (end_time - new_start).div_euclid(width);
			let mut end_mod = (end_time - new_start).rem_euclid(width);
			if end_bucket >= count {
				end_bucket = count - 1;
				end_mod = width;
			}
			if start_bucket == end_bucket {
				// The whole sample lands in a single bucket
				add(start_bucket, v * (end_mod - start_mod) as f64);
			} else {
				// The sample spans two or more buckets
				add(start_bucket, v * (width - start_mod) as f64);
				for j in start_bucket + 1..end_bucket {
					add(j, v * width as f64);
				}
				if end_mod > 0 {
					add(end_bucket, v * end_mod as f64);
				}
			}
		}
		let name = format!("hitcount({}, \"{interval}\")", s.name);
		results.push(TimeSeries::new(name, new_start, s.end, width, buckets));
	}
	Ok(results.into())
}
