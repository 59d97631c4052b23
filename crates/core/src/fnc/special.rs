use crate::ctx::Context;
use crate::err::Error;
use crate::fnc::combine::series_groups;
use crate::series::{ConsolidationFunc, TimeSeries, Value};

/// Replace the display name of each series outright
pub fn alias((mut series, label): (Vec<TimeSeries>, String)) -> Result<Value, Error> {
	for s in series.iter_mut() {
		s.name.clone_from(&label);
	}
	Ok(series.into())
}

/// Assign a draw colour to each series
pub fn color((mut series, value): (Vec<TimeSeries>, String)) -> Result<Value, Error> {
	for s in series.iter_mut() {
		s.options.color = Some(value.clone());
	}
	Ok(series.into())
}

/// Override the draw width of each series
pub fn line_width((mut series, width): (Vec<TimeSeries>, f64)) -> Result<Value, Error> {
	for s in series.iter_mut() {
		s.options.line_width = Some(width);
	}
	Ok(series.into())
}

/// Draw each series dashed, with the given segment length
pub fn dashed((mut series, length): (Vec<TimeSeries>, Option<f64>)) -> Result<Value, Error> {
	let length = length.unwrap_or(5.0);
	for s in series.iter_mut() {
		s.name = format!("dashed({}, {})", s.name, length as i64);
		s.options.dashed = Some(length);
	}
	Ok(series.into())
}

/// Draw each series against the secondary y axis
pub fn second_y_axis((mut series,): (Vec<TimeSeries>,)) -> Result<Value, Error> {
	for s in series.iter_mut() {
		s.options.second_y_axis = true;
		s.name = format!("secondYAxis({})", s.name);
	}
	Ok(series.into())
}

/// Draw each non-zero value as a vertical line to infinity
pub fn draw_as_infinite((mut series,): (Vec<TimeSeries>,)) -> Result<Value, Error> {
	for s in series.iter_mut() {
		s.options.draw_as_infinite = true;
		s.name = format!("drawAsInfinite({})", s.name);
	}
	Ok(series.into())
}

/// Consolidate each series by summing instead of averaging
pub fn cumulative((mut series,): (Vec<TimeSeries>,)) -> Result<Value, Error> {
	for s in series.iter_mut() {
		s.consolidation = ConsolidationFunc::Sum;
		s.name = format!("cumulative({})", s.name);
	}
	Ok(series.into())
}

/// Trim the displayed name to the dot-segments in `[start, stop)`, or
/// `[start, ..)` when `stop` is zero, stripping any function wrapper first
pub fn substr(
	(mut series, start, stop): (Vec<TimeSeries>, Option<i64>, Option<i64>),
) -> Result<Value, Error> {
	let start = start.unwrap_or(0).max(0) as usize;
	let stop = stop.unwrap_or(0);
	for s in series.iter_mut() {
		let left = s.name.rfind('(').map(|i| i + 1).unwrap_or(0);
		let right = s.name.find(')').unwrap_or(s.name.len());
		let clean = s.name.get(left..right).unwrap_or(&s.name);
		let parts = clean.split('.').collect::<Vec<_>>();
		let stop = match stop {
			0 => parts.len(),
			_ => (stop.max(0) as usize).min(parts.len()),
		};
		s.name = parts.get(start..stop).unwrap_or(&[]).join(".");
	}
	Ok(series.into())
}

/// A single flat series at the given value, spanning the context window
pub fn constant_line(ctx: &Context, (value,): (f64,)) -> Result<Value, Error> {
	let start = ctx.start();
	let end = ctx.end();
	let series = TimeSeries::new(format!("{value}"), start, end, end - start, vec![Some(value)]);
	Ok(series.into())
}

/// A constant line with an optional label and colour
pub fn threshold(
	ctx: &Context,
	(value, label, color): (f64, Option<String>, Option<String>),
) -> Result<Value, Error> {
	let mut series = constant_line(ctx, (value,))?.into_series().unwrap_or_default();
	for s in series.iter_mut() {
		if let Some(label) = &label {
			s.name.clone_from(label);
		}
		if color.is_some() {
			s.options.color.clone_from(&color);
		}
	}
	Ok(series.into())
}

/// Concatenate any number of series lists into one
pub fn group(args: Vec<Value>) -> Result<Value, Error> {
	let groups = series_groups("group", args)?;
	Ok(groups.into_iter().flatten().collect::<Vec<_>>().into())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn series(name: &str, values: Vec<Option<f64>>) -> TimeSeries {
		TimeSeries::new(name, 0, 10 * values.len() as i64, 10, values)
	}

	fn as_series(value: Value) -> Vec<TimeSeries> {
		value.into_series().expect("expected a series list")
	}

	#[test]
	fn alias_replaces_the_name_outright() {
		let s = series("servers.web01.cpu", vec![Some(1.0)]);
		let out = as_series(
			alias((vec![s], String::from("Web CPU"))).expect("alias failed"),
		);
		assert_eq!(out[0].name, "Web CPU");
		// The path expression still identifies the origin
		assert_eq!(out[0].path_expression, "servers.web01.cpu");
	}

	#[test]
	fn presentation_hints_land_in_the_options() {
		let s = series("a", vec![Some(1.0)]);
		let out = as_series(color((vec![s], String::from("green"))).expect("color failed"));
		let out = as_series(line_width((out, 2.5)).expect("lineWidth failed"));
		let out = as_series(second_y_axis((out,)).expect("secondYAxis failed"));
		let out = as_series(draw_as_infinite((out,)).expect("drawAsInfinite failed"));
		let s = &out[0];
		assert_eq!(s.options.color.as_deref(), Some("green"));
		assert_eq!(s.options.line_width, Some(2.5));
		assert!(s.options.second_y_axis);
		assert!(s.options.draw_as_infinite);
		assert_eq!(s.name, "drawAsInfinite(secondYAxis(a))");
	}

	#[test]
	fn dashed_defaults_to_five() {
		let s = series("a", vec![Some(1.0)]);
		let out = as_series(dashed((vec![s], None)).expect("dashed failed"));
		assert_eq!(out[0].options.dashed, Some(5.0));
		assert_eq!(out[0].name, "dashed(a, 5)");
	}

	#[test]
	fn cumulative_switches_consolidation_to_sum() {
		let s = series("a", vec![Some(1.0)]);
		let out = as_series(cumulative((vec![s],)).expect("cumulative failed"));
		assert_eq!(out[0].consolidation, ConsolidationFunc::Sum);
		assert_eq!(out[0].name, "cumulative(a)");
	}

	#[test]
	fn substr_trims_dot_segments() {
		let s = series("pyrite.agents.host.avgUpdateTime", vec![Some(1.0)]);
		let out = as_series(
			substr((vec![s], Some(2), Some(4))).expect("substr failed"),
		);
		assert_eq!(out[0].name, "host.avgUpdateTime");
	}

	#[test]
	fn substr_strips_function_wrappers() {
		let s = series("keepLastValue(servers.web01.cpu)", vec![Some(1.0)]);
		let out = as_series(substr((vec![s], Some(1), None)).expect("substr failed"));
		assert_eq!(out[0].name, "web01.cpu");
	}

	#[test]
	fn constant_line_spans_the_window() {
		let ctx = Context::new(100, 400);
		let out = as_series(constant_line(&ctx, (123.456,)).expect("constantLine failed"));
		assert_eq!(out[0].name, "123.456");
		assert_eq!((out[0].start, out[0].end, out[0].step), (100, 400, 300));
		assert_eq!(out[0].values, vec![Some(123.456)]);
	}

	#[test]
	fn threshold_overrides_label_and_color() {
		let ctx = Context::new(0, 100);
		let out = as_series(
			threshold(&ctx, (95.0, Some(String::from("limit")), Some(String::from("red"))))
				.expect("threshold failed"),
		);
		assert_eq!(out[0].name, "limit");
		assert_eq!(out[0].options.color.as_deref(), Some("red"));
		assert_eq!(out[0].values, vec![Some(95.0)]);
	}

	#[test]
	fn group_concatenates_lists() {
		let a = series("a", vec![Some(1.0)]);
		let b = series("b", vec![Some(2.0)]);
		let c = series("c", vec![Some(3.0)]);
		let out = as_series(
			group(vec![Value::Series(vec![a, b]), Value::Series(vec![c])])
				.expect("group failed"),
		);
		assert_eq!(out.len(), 3);
		assert_eq!(out[2].name, "c");
	}
}
