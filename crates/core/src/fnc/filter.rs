use crate::err::Error;
use crate::fnc::util::math::variance::Variance;
use crate::fnc::util::math::{safe_div, safe_last, safe_len, safe_max, safe_min, safe_sum};
use crate::series::{TimeSeries, Value};
use regex::Regex;
use std::cmp::Ordering;

/// The most recent present value of a series
fn current(s: &TimeSeries) -> Option<f64> {
	safe_last(&s.values)
}

/// The mean of the present values of a series
fn mean(s: &TimeSeries) -> Option<f64> {
	safe_div(safe_sum(&s.values), Some(safe_len(&s.values) as f64))
}

/// The largest present value of a series
fn maximum(s: &TimeSeries) -> Option<f64> {
	safe_max(&s.values)
}

/// Sort ascending by the given summary, absent summaries first. Ties keep
/// their input order.
fn sort_ascending(series: &mut [TimeSeries], summary: impl Fn(&TimeSeries) -> Option<f64>) {
	series.sort_by(|a, b| {
		let a = summary(a).unwrap_or(f64::NEG_INFINITY);
		let b = summary(b).unwrap_or(f64::NEG_INFINITY);
		a.partial_cmp(&b).unwrap_or(Ordering::Equal)
	});
}

/// The last `n` of an ascending sort by the given summary
fn top(
	mut series: Vec<TimeSeries>,
	n: usize,
	summary: impl Fn(&TimeSeries) -> Option<f64>,
) -> Vec<TimeSeries> {
	sort_ascending(&mut series, summary);
	series.split_off(series.len().saturating_sub(n))
}

/// The first `n` of an ascending sort by the given summary
fn bottom(
	mut series: Vec<TimeSeries>,
	n: usize,
	summary: impl Fn(&TimeSeries) -> Option<f64>,
) -> Vec<TimeSeries> {
	sort_ascending(&mut series, summary);
	series.truncate(n);
	series
}

/// The sub-list whose summary is present and satisfies the predicate
fn satisfying(
	series: Vec<TimeSeries>,
	summary: impl Fn(&TimeSeries) -> Option<f64>,
	predicate: impl Fn(f64) -> bool,
) -> Vec<TimeSeries> {
	series.into_iter().filter(|s| summary(s).is_some_and(&predicate)).collect()
}

pub fn highest_current((series, n): (Vec<TimeSeries>, usize)) -> Result<Value, Error> {
	Ok(top(series, n, current).into())
}

pub fn lowest_current((series, n): (Vec<TimeSeries>, usize)) -> Result<Value, Error> {
	Ok(bottom(series, n, current).into())
}

pub fn highest_max((series, n): (Vec<TimeSeries>, usize)) -> Result<Value, Error> {
	let mut kept = top(series, n, maximum);
	// Present the winners largest first; a stable sort keeps tied series in
	// the order the ascending pass left them
	kept.sort_by(|a, b| {
		let a = maximum(a).unwrap_or(f64::NEG_INFINITY);
		let b = maximum(b).unwrap_or(f64::NEG_INFINITY);
		b.partial_cmp(&a).unwrap_or(Ordering::Equal)
	});
	Ok(kept.into())
}

pub fn highest_average((series, n): (Vec<TimeSeries>, usize)) -> Result<Value, Error> {
	Ok(top(series, n, mean).into())
}

pub fn lowest_average((series, n): (Vec<TimeSeries>, usize)) -> Result<Value, Error> {
	Ok(bottom(series, n, mean).into())
}

pub fn current_above((series, n): (Vec<TimeSeries>, f64)) -> Result<Value, Error> {
	Ok(satisfying(series, current, |v| v >= n).into())
}

pub fn current_below((series, n): (Vec<TimeSeries>, f64)) -> Result<Value, Error> {
	Ok(satisfying(series, current, |v| v <= n).into())
}

pub fn average_above((series, n): (Vec<TimeSeries>, f64)) -> Result<Value, Error> {
	Ok(satisfying(series, mean, |v| v >= n).into())
}

pub fn average_below((series, n): (Vec<TimeSeries>, f64)) -> Result<Value, Error> {
	Ok(satisfying(series, mean, |v| v <= n).into())
}

pub fn maximum_above((series, n): (Vec<TimeSeries>, f64)) -> Result<Value, Error> {
	Ok(satisfying(series, maximum, |v| v >= n).into())
}

pub fn maximum_below((series, n): (Vec<TimeSeries>, f64)) -> Result<Value, Error> {
	Ok(satisfying(series, maximum, |v| v <= n).into())
}

/// The `n` series whose present values deviate most from their own mean,
/// by population variance
pub fn most_deviant((n, series): (usize, Vec<TimeSeries>)) -> Result<Value, Error> {
	let mut deviants = series
		.into_iter()
		.filter_map(|s| s.values.variance().map(|sigma| (sigma, s)))
		.collect::<Vec<_>>();
	deviants.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
	deviants.truncate(n);
	Ok(deviants.into_iter().map(|(_, s)| s).collect::<Vec<_>>().into())
}

/// The first `n` series in input order
pub fn limit((mut series, n): (Vec<TimeSeries>, usize)) -> Result<Value, Error> {
	series.truncate(n);
	Ok(series.into())
}

/// Stable sort, largest maximum first
pub fn sort_by_maxima((mut series,): (Vec<TimeSeries>,)) -> Result<Value, Error> {
	series.sort_by(|a, b| {
		let a = maximum(a).unwrap_or(f64::NEG_INFINITY);
		let b = maximum(b).unwrap_or(f64::NEG_INFINITY);
		b.partial_cmp(&a).unwrap_or(Ordering::Equal)
	});
	Ok(series.into())
}

/// Stable sort, smallest minimum first, dropping series whose maximum is
/// not above zero
pub fn sort_by_minima((series,): (Vec<TimeSeries>,)) -> Result<Value, Error> {
	let mut kept = series
		.into_iter()
		.filter(|s| maximum(s).is_some_and(|max| max > 0.0))
		.collect::<Vec<_>>();
	sort_ascending(&mut kept, |s| safe_min(&s.values));
	Ok(kept.into())
}

/// Retain the series whose name does not match the pattern
pub fn exclude((series, pattern): (Vec<TimeSeries>, String)) -> Result<Value, Error> {
	let regex = Regex::new(&pattern).map_err(|_| Error::InvalidArguments {
		name: String::from("exclude"),
		message: format!("Invalid regular expression '{pattern}'."),
	})?;
	Ok(series.into_iter().filter(|s| !regex.is_match(&s.name)).collect::<Vec<_>>().into())
}
