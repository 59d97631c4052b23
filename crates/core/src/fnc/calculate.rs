use crate::err::Error;
use crate::fnc::util::math::percentile;
use crate::series::{TimeSeries, Value};

fn window_guard(name: &str, window: usize) -> Result<(), Error> {
	match window {
		0 => Err(Error::InvalidArguments {
			name: name.to_owned(),
			message: String::from("The window must be an integer greater than 0."),
		}),
		_ => Ok(()),
	}
}

/// The mean of the present values over the trailing window of each slot.
/// The first `window - 1` slots are absent.
pub fn moving_average((series, window): (Vec<TimeSeries>, usize)) -> Result<Value, Error> {
	window_guard("movingAverage", window)?;
	let mut results = Vec::with_capacity(series.len());
	for s in series {
		let values = (0..s.values.len())
			.map(|i| {
				if i + 1 < window {
					return None;
				}
				let trailing = &s.values[i + 1 - window..=i];
				let present = trailing.iter().flatten().copied().collect::<Vec<f64>>();
				match present.is_empty() {
					true => None,
					false => Some(present.iter().sum::<f64>() / present.len() as f64),
				}
			})
			.collect();
		let name = format!("movingAverage({},{:.1})", s.name, window as f64);
		results.push(TimeSeries::new(name, s.start, s.end, s.step, values));
	}
	Ok(results.into())
}

/// The sliding population standard deviation over the trailing window.
///
/// The running sum of squares is updated incrementally as slots enter and
/// leave the window. Absent slots contribute zero to the sums but the
/// divisor stays the window size, biasing the deviation downward across
/// gaps; the behaviour is deliberate and pinned by a test.
pub fn stdev((series, window): (Vec<TimeSeries>, usize)) -> Result<Value, Error> {
	window_guard("stdev", window)?;
	let n = window as f64;
	let mut results = Vec::with_capacity(series.len());
	for s in series {
		let mut sum = 0.0;
		let mut sum_of_squares = 0.0;
		let values = (0..s.values.len())
			.map(|i| {
				let add = s.values[i].unwrap_or(0.0);
				sum += add;
				sum_of_squares += add * add;
				if i >= window {
					let drop = s.values[i - window].unwrap_or(0.0);
					sum -= drop;
					sum_of_squares -= drop * drop;
				}
				if i + 1 < window {
					return None;
				}
				let mean = sum / n;
				Some((sum_of_squares / n - mean * mean).max(0.0).sqrt())
			})
			.collect();
		let name = format!("stddev({},{:.1})", s.name, window as f64);
		results.push(TimeSeries::new(name, s.start, s.end, s.step, values));
	}
	Ok(results.into())
}

/// Reduce each series to a single sample holding the n-th percentile of its
/// present values. The percentile rank is clamped to the value range, and a
/// series whose percentile is absent or non-positive is dropped from the
/// output.
pub fn n_percentile((series, n): (Vec<TimeSeries>, f64)) -> Result<Value, Error> {
	let mut results = Vec::new();
	for s in series {
		let mut present = s.values.iter().flatten().copied().collect::<Vec<f64>>();
		let Some(value) = percentile::ordinal(&mut present, n) else {
			continue;
		};
		if value <= 0.0 {
			continue;
		}
		let name = format!("{n}th Percentile({}, {value:.1})", s.name);
		results.push(TimeSeries::new(name, s.start, s.end, s.step, vec![Some(value)]));
	}
	Ok(results.into())
}
