use crate::err::Error;
use crate::fnc::args::FromArg;
use crate::fnc::util::math::{safe_diff, safe_div, safe_len, safe_max, safe_min, safe_mul, safe_sum};
use crate::series::{Normalized, TimeSeries, Value, normalize};
use std::collections::HashMap;

/// Extract one series list per argument
pub(super) fn series_groups(name: &str, args: Vec<Value>) -> Result<Vec<Vec<TimeSeries>>, Error> {
	if args.is_empty() {
		return Err(Error::InvalidArguments {
			name: name.to_owned(),
			message: String::from("Expected at least one series list."),
		});
	}
	args.into_iter()
		.map(|arg| {
			arg.into_series().ok_or_else(|| Error::InvalidArguments {
				name: name.to_owned(),
				message: String::from("Every argument must be a series list."),
			})
		})
		.collect()
}

/// The comma-joined unique path expressions of a set of series
fn joined(series: &[TimeSeries]) -> String {
	let mut unique = Vec::<&str>::new();
	for s in series {
		if !unique.contains(&s.path_expression.as_str()) {
			unique.push(&s.path_expression);
		}
	}
	unique.join(",")
}

/// Normalize the groups and fold each aligned column into a single series.
///
/// Columns are folded up to the shortest aligned series; an empty input
/// produces an empty result rather than an error.
fn combined(
	label: &str,
	groups: Vec<Vec<TimeSeries>>,
	f: impl Fn(&[Option<f64>]) -> Option<f64>,
) -> Vec<TimeSeries> {
	let Some(Normalized {
		series,
		start,
		end,
		step,
	}) = normalize(groups)
	else {
		return Vec::new();
	};
	let name = format!("{label}({})", joined(&series));
	let len = series.iter().map(TimeSeries::len).min().unwrap_or(0);
	let values = (0..len)
		.map(|i| {
			let column = series.iter().map(|s| s.values[i]).collect::<Vec<_>>();
			f(&column)
		})
		.collect();
	vec![TimeSeries::new(name, start, end, step, values)]
}

pub fn sum(args: Vec<Value>) -> Result<Value, Error> {
	Ok(combined("sumSeries", series_groups("sumSeries", args)?, safe_sum).into())
}

pub fn diff(args: Vec<Value>) -> Result<Value, Error> {
	Ok(combined("diffSeries", series_groups("diffSeries", args)?, safe_diff).into())
}

pub fn average(args: Vec<Value>) -> Result<Value, Error> {
	let groups = series_groups("averageSeries", args)?;
	Ok(combined("averageSeries", groups, |column| {
		safe_div(safe_sum(column), Some(safe_len(column) as f64))
	})
	.into())
}

pub fn min(args: Vec<Value>) -> Result<Value, Error> {
	Ok(combined("minSeries", series_groups("minSeries", args)?, safe_min).into())
}

pub fn max(args: Vec<Value>) -> Result<Value, Error> {
	Ok(combined("maxSeries", series_groups("maxSeries", args)?, safe_max).into())
}

/// Divide each dividend series by a single divisor series
pub fn divide(
	(dividends, mut divisors): (Vec<TimeSeries>, Vec<TimeSeries>),
) -> Result<Value, Error> {
	if divisors.len() != 1 {
		return Err(Error::InvalidArguments {
			name: String::from("divideSeries"),
			message: String::from("The second argument must reference exactly one series."),
		});
	}
	let divisor = divisors.remove(0);
	let mut results = Vec::with_capacity(dividends.len());
	for dividend in dividends {
		let name = format!("divideSeries({},{})", dividend.name, divisor.name);
		let Some(Normalized {
			series,
			start,
			end,
			step,
		}) = normalize(vec![vec![dividend, divisor.clone()]])
		else {
			continue;
		};
		let len = series.iter().map(TimeSeries::len).min().unwrap_or(0);
		let values = (0..len).map(|i| safe_div(series[0].values[i], series[1].values[i])).collect();
		results.push(TimeSeries::new(name, start, end, step, values));
	}
	Ok(results.into())
}

/// Draw one series as a percentage of another series, or of a constant
pub fn as_percent((series, base): (Vec<TimeSeries>, Value)) -> Result<Value, Error> {
	let arity = |message: &str| Error::InvalidArguments {
		name: String::from("asPercent"),
		message: message.to_owned(),
	};
	if series.len() != 1 {
		return Err(arity("The series arguments must reference exactly one series."));
	}
	match base {
		Value::Series(other) => {
			if other.len() != 1 {
				return Err(arity("The series arguments must reference exactly one series."));
			}
			let pair = vec![series, other].concat();
			let name = format!("asPercent({},{})", pair[0].name, pair[1].name);
			let Some(Normalized {
				series,
				start,
				end,
				step,
			}) = normalize(vec![pair])
			else {
				return Ok(Value::Series(Vec::new()));
			};
			let len = series.iter().map(TimeSeries::len).min().unwrap_or(0);
			let values = (0..len)
				.map(|i| safe_mul(safe_div(series[0].values[i], series[1].values[i]), Some(100.0)))
				.collect();
			Ok(TimeSeries::new(name, start, end, step, values).into())
		}
		Value::Number(number) => {
			let s = &series[0];
			let name = format!("asPercent({},{number:.1})", s.name);
			let values = s
				.values
				.iter()
				.map(|&v| safe_mul(safe_div(v, Some(number)), Some(100.0)))
				.collect();
			Ok(TimeSeries::new(name, s.start, s.end, s.step, values).into())
		}
		_ => Err(arity("The second argument must be a series list or a number.")),
	}
}

/// Strip the dot-separated name positions given by the caller, then collect
/// the series into groups keyed by the stripped name, in first-seen order
fn wildcard_groups(
	name: &str,
	mut args: Vec<Value>,
) -> Result<Vec<(String, Vec<TimeSeries>)>, Error> {
	if args.is_empty() {
		return Err(Error::InvalidArguments {
			name: name.to_owned(),
			message: String::from("Expected a series list followed by name positions."),
		});
	}
	let series = Vec::<TimeSeries>::from_arg(name, args.remove(0))?;
	let positions = args
		.into_iter()
		.map(|arg| usize::from_arg(name, arg))
		.collect::<Result<Vec<usize>, Error>>()?;
	let mut order = Vec::<String>::new();
	let mut grouped = HashMap::<String, Vec<TimeSeries>>::new();
	for s in series {
		let key = s
			.name
			.split('.')
			.enumerate()
			.filter(|(i, _)| !positions.contains(i))
			.map(|(_, part)| part)
			.collect::<Vec<_>>()
			.join(".");
		if !grouped.contains_key(&key) {
			order.push(key.clone());
		}
		grouped.entry(key).or_default().push(s);
	}
	Ok(order
		.into_iter()
		.map(|key| {
			let group = grouped.remove(&key).unwrap_or_default();
			(key, group)
		})
		.collect())
}

/// Sum series grouped by their name with the given positions stripped
pub fn sum_with_wildcards(args: Vec<Value>) -> Result<Value, Error> {
	let mut results = Vec::new();
	for (key, mut group) in wildcard_groups("sumSeriesWithWildcards", args)? {
		if group.len() == 1 {
			// A group of one passes through under the stripped name
			let mut s = group.remove(0);
			s.name = key;
			results.push(s);
		} else {
			for mut s in combined("sumSeries", vec![group], safe_sum) {
				s.name = key.clone();
				results.push(s);
			}
		}
	}
	Ok(results.into())
}

/// Average series grouped by their name with the given positions stripped
pub fn average_with_wildcards(args: Vec<Value>) -> Result<Value, Error> {
	let mut results = Vec::new();
	for (key, group) in wildcard_groups("averageSeriesWithWildcards", args)? {
		let folded = combined("averageSeries", vec![group], |column| {
			safe_div(safe_sum(column), Some(safe_len(column) as f64))
		});
		for mut s in folded {
			s.name = key.clone();
			results.push(s);
		}
	}
	Ok(results.into())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn series(name: &str, start: i64, step: i64, values: Vec<Option<f64>>) -> TimeSeries {
		let end = start + step * values.len() as i64;
		TimeSeries::new(name, start, end, step, values)
	}

	fn as_series(value: Value) -> Vec<TimeSeries> {
		value.into_series().expect("expected a series list")
	}

	#[test]
	fn sum_normalizes_mixed_steps() {
		let a = series("a", 0, 10, vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
		let b = series("b", 0, 20, vec![Some(10.0), Some(20.0)]);
		let out = as_series(sum(vec![a.into(), b.into()]).expect("sum failed"));
		assert_eq!(out.len(), 1);
		assert_eq!(out[0].name, "sumSeries(a,b)");
		assert_eq!(out[0].path_expression, "sumSeries(a,b)");
		assert_eq!((out[0].start, out[0].end, out[0].step), (0, 40, 20));
		assert_eq!(out[0].values, vec![Some(11.5), Some(23.5)]);
	}

	#[test]
	fn sum_skips_absent_values() {
		let a = series("a", 0, 10, vec![Some(1.0), None, None]);
		let b = series("b", 0, 10, vec![Some(2.0), Some(5.0), None]);
		let out = as_series(sum(vec![a.into(), b.into()]).expect("sum failed"));
		assert_eq!(out[0].values, vec![Some(3.0), Some(5.0), None]);
	}

	#[test]
	fn sum_is_order_independent() {
		let a = series("a", 0, 10, vec![Some(1.0), Some(2.0)]);
		let b = series("b", 0, 10, vec![Some(3.0), None]);
		let c = series("c", 0, 10, vec![Some(5.0), Some(7.0)]);
		let forward = as_series(
			sum(vec![a.clone().into(), b.clone().into(), c.clone().into()]).expect("sum failed"),
		);
		let backward = as_series(sum(vec![c.into(), b.into(), a.into()]).expect("sum failed"));
		assert_eq!(forward[0].values, backward[0].values);
	}

	#[test]
	fn sum_of_nothing_is_empty() {
		let out = as_series(sum(vec![Value::Series(Vec::new())]).expect("sum failed"));
		assert!(out.is_empty());
	}

	#[test]
	fn diff_subtracts_the_rest() {
		let a = series("a", 0, 10, vec![Some(10.0), Some(10.0)]);
		let b = series("b", 0, 10, vec![Some(3.0), None]);
		let out = as_series(diff(vec![a.into(), b.into()]).expect("diff failed"));
		assert_eq!(out[0].name, "diffSeries(a,b)");
		assert_eq!(out[0].values, vec![Some(7.0), Some(10.0)]);
	}

	#[test]
	fn average_divides_by_present_count() {
		let a = series("a", 0, 10, vec![Some(1.0), None]);
		let b = series("b", 0, 10, vec![Some(3.0), Some(5.0)]);
		let out = as_series(average(vec![a.into(), b.into()]).expect("average failed"));
		assert_eq!(out[0].name, "averageSeries(a,b)");
		assert_eq!(out[0].values, vec![Some(2.0), Some(5.0)]);
	}

	#[test]
	fn min_and_max_pick_present_extremes() {
		let a = series("a", 0, 10, vec![Some(1.0), None]);
		let b = series("b", 0, 10, vec![Some(3.0), None]);
		let low = as_series(min(vec![a.clone().into(), b.clone().into()]).expect("min failed"));
		let high = as_series(max(vec![a.into(), b.into()]).expect("max failed"));
		assert_eq!(low[0].values, vec![Some(1.0), None]);
		assert_eq!(high[0].values, vec![Some(3.0), None]);
	}

	#[test]
	fn repeated_path_expressions_join_once() {
		let a = series("servers.*.cpu", 0, 10, vec![Some(1.0)]);
		let b = series("servers.*.cpu", 0, 10, vec![Some(2.0)]);
		let out = as_series(sum(vec![Value::Series(vec![a, b])]).expect("sum failed"));
		assert_eq!(out[0].name, "sumSeries(servers.*.cpu)");
	}

	#[test]
	fn divide_requires_a_single_divisor() {
		let a = series("a", 0, 10, vec![Some(1.0)]);
		let b = series("b", 0, 10, vec![Some(2.0)]);
		let c = series("c", 0, 10, vec![Some(3.0)]);
		let out = divide((vec![a], vec![b, c]));
		assert!(matches!(out, Err(Error::InvalidArguments { .. })));
	}

	#[test]
	fn divide_by_zero_is_absent() {
		let a = series("a", 0, 10, vec![Some(4.0), Some(9.0), None]);
		let b = series("b", 0, 10, vec![Some(2.0), Some(0.0), Some(3.0)]);
		let out = as_series(divide((vec![a], vec![b])).expect("divide failed"));
		assert_eq!(out[0].name, "divideSeries(a,b)");
		assert_eq!(out[0].values, vec![Some(2.0), None, None]);
	}

	#[test]
	fn divide_fans_out_over_dividends() {
		let a = series("a", 0, 10, vec![Some(4.0)]);
		let b = series("b", 0, 10, vec![Some(8.0)]);
		let d = series("d", 0, 10, vec![Some(2.0)]);
		let out = as_series(divide((vec![a, b], vec![d])).expect("divide failed"));
		assert_eq!(out.len(), 2);
		assert_eq!(out[0].values, vec![Some(2.0)]);
		assert_eq!(out[1].values, vec![Some(4.0)]);
	}

	#[test]
	fn as_percent_of_a_constant() {
		let a = series("a", 0, 10, vec![Some(25.0), None]);
		let out =
			as_series(as_percent((vec![a], Value::from(50.0))).expect("asPercent failed"));
		assert_eq!(out[0].name, "asPercent(a,50.0)");
		assert_eq!(out[0].values, vec![Some(50.0), None]);
	}

	#[test]
	fn as_percent_of_a_series() {
		let a = series("a", 0, 10, vec![Some(1.0), Some(3.0)]);
		let b = series("b", 0, 10, vec![Some(4.0), Some(0.0)]);
		let out = as_series(
			as_percent((vec![a], Value::Series(vec![b]))).expect("asPercent failed"),
		);
		assert_eq!(out[0].name, "asPercent(a,b)");
		assert_eq!(out[0].values, vec![Some(25.0), None]);
	}

	#[test]
	fn as_percent_rejects_multiple_series() {
		let a = series("a", 0, 10, vec![Some(1.0)]);
		let b = series("b", 0, 10, vec![Some(2.0)]);
		let out = as_percent((vec![a, b], Value::from(10.0)));
		assert!(matches!(out, Err(Error::InvalidArguments { .. })));
	}

	#[test]
	fn wildcard_sums_group_by_stripped_name() {
		let a = series("servers.one.cpu", 0, 10, vec![Some(1.0)]);
		let b = series("servers.two.cpu", 0, 10, vec![Some(2.0)]);
		let c = series("servers.one.mem", 0, 10, vec![Some(3.0)]);
		let out = as_series(
			sum_with_wildcards(vec![Value::Series(vec![a, b, c]), Value::from(1.0)])
				.expect("sumSeriesWithWildcards failed"),
		);
		assert_eq!(out.len(), 2);
		assert_eq!(out[0].name, "servers.cpu");
		assert_eq!(out[0].values, vec![Some(3.0)]);
		assert_eq!(out[1].name, "servers.mem");
		assert_eq!(out[1].values, vec![Some(3.0)]);
	}

	#[test]
	fn wildcard_averages_group_by_stripped_name() {
		let a = series("servers.one.cpu", 0, 10, vec![Some(1.0)]);
		let b = series("servers.two.cpu", 0, 10, vec![Some(3.0)]);
		let out = as_series(
			average_with_wildcards(vec![Value::Series(vec![a, b]), Value::from(1.0)])
				.expect("averageSeriesWithWildcards failed"),
		);
		assert_eq!(out.len(), 1);
		assert_eq!(out[0].name, "servers.cpu");
		assert_eq!(out[0].values, vec![Some(2.0)]);
	}
}
