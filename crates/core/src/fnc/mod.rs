//! Executes series functions on previously retrieved series. Every function
//! invoked by the rendering layer is defined in this module.

use crate::ctx::Context;
use crate::err::Error;
use crate::series::Value;

pub mod args;
pub mod calculate;
pub mod combine;
pub mod filter;
pub mod special;
pub mod transform;
pub mod util;

/// Attempts to run any series function
pub fn run(ctx: &Context, name: &str, args: Vec<Value>) -> Result<Value, Error> {
	// Every function in the catalog is pure and runs on the query worker
	synchronous(ctx, name, args)
}

/// Each function is specified by its name (a string literal) followed by its
/// path. The path may be followed by one parenthesized argument, e.g. ctx,
/// which is passed to the function before the remainder of the arguments.
macro_rules! dispatch {
	($name: ident, $args: ident, $($function_name: literal => $($function_path: ident)::+ $(($ctx_arg: expr))*,)+) => {
		{
			match $name {
				$($function_name => {
					let args = args::FromArgs::from_args($name, $args)?;
					$($function_path)::+($($ctx_arg,)* args)
				},)+
				_ => {
					return Err($crate::err::Error::InvalidFunction{
						name: String::from($name),
						message: "no such series function".to_string()
					})
				}
			}
		}
	};
}

/// Attempts to run any synchronous series function
pub fn synchronous(ctx: &Context, name: &str, args: Vec<Value>) -> Result<Value, Error> {
	dispatch!(
		name,
		args,
		// Combine functions
		"sumSeries" => combine::sum,
		"sum" => combine::sum,
		"diffSeries" => combine::diff,
		"divideSeries" => combine::divide,
		"averageSeries" => combine::average,
		"avg" => combine::average,
		"sumSeriesWithWildcards" => combine::sum_with_wildcards,
		"averageSeriesWithWildcards" => combine::average_with_wildcards,
		"minSeries" => combine::min,
		"maxSeries" => combine::max,
		//
		// Transform functions
		"scale" => transform::scale,
		"offset" => transform::offset,
		"derivative" => transform::derivative,
		"integral" => transform::integral,
		"nonNegativeDerivative" => transform::non_negative_derivative,
		"log" => transform::log,
		"timeShift" => transform::time_shift(ctx),
		"summarize" => transform::summarize,
		"hitcount" => transform::hitcount,
		//
		// Calculate functions
		"movingAverage" => calculate::moving_average,
		"stdev" => calculate::stdev,
		"asPercent" => combine::as_percent,
		"pct" => combine::as_percent,
		//
		// Filter functions
		"mostDeviant" => filter::most_deviant,
		"highestCurrent" => filter::highest_current,
		"lowestCurrent" => filter::lowest_current,
		"highestMax" => filter::highest_max,
		"currentAbove" => filter::current_above,
		"currentBelow" => filter::current_below,
		"highestAverage" => filter::highest_average,
		"lowestAverage" => filter::lowest_average,
		"averageAbove" => filter::average_above,
		"averageBelow" => filter::average_below,
		"maximumAbove" => filter::maximum_above,
		"maximumBelow" => filter::maximum_below,
		"nPercentile" => calculate::n_percentile,
		"limit" => filter::limit,
		"sortByMaxima" => filter::sort_by_maxima,
		"sortByMinima" => filter::sort_by_minima,
		//
		// Special functions
		"alias" => special::alias,
		"color" => special::color,
		"cumulative" => special::cumulative,
		"keepLastValue" => transform::keep_last_value,
		"drawAsInfinite" => special::draw_as_infinite,
		"secondYAxis" => special::second_y_axis,
		"lineWidth" => special::line_width,
		"dashed" => special::dashed,
		"substr" => special::substr,
		"group" => special::group,
		"exclude" => filter::exclude,
		"constantLine" => special::constant_line(ctx),
		"threshold" => special::threshold(ctx),
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::series::TimeSeries;

	fn series(name: &str, values: Vec<Option<f64>>) -> Value {
		Value::Series(vec![TimeSeries::new(name, 0, 10 * values.len() as i64, 10, values)])
	}

	#[test]
	fn unknown_functions_are_a_typed_error() {
		let ctx = Context::new(0, 100);
		let out = run(&ctx, "explode", Vec::new());
		assert!(matches!(out, Err(Error::InvalidFunction { .. })));
	}

	#[test]
	fn aliases_dispatch_to_the_same_function() {
		let ctx = Context::new(0, 100);
		let long = run(&ctx, "sumSeries", vec![series("a", vec![Some(1.0)])])
			.expect("sumSeries failed");
		let short =
			run(&ctx, "sum", vec![series("a", vec![Some(1.0)])]).expect("sum failed");
		assert_eq!(long, short);
	}

	#[test]
	fn arity_errors_surface_to_the_caller() {
		let ctx = Context::new(0, 100);
		let out = run(&ctx, "scale", vec![series("a", vec![Some(1.0)])]);
		assert!(matches!(out, Err(Error::InvalidArguments { .. })));
	}

	#[test]
	fn context_functions_receive_the_window() {
		let ctx = Context::new(100, 200);
		let out = run(&ctx, "constantLine", vec![Value::from(7.0)])
			.expect("constantLine failed")
			.into_series()
			.expect("expected a series list");
		assert_eq!((out[0].start, out[0].end), (100, 200));
	}

	#[test]
	fn every_cataloged_function_dispatches() {
		// Drive each name through the dispatcher with plausible arguments so
		// that a missing match arm shows up as an unknown-function error.
		let ctx = Context::new(0, 100);
		let calls: Vec<(&str, Vec<Value>)> = vec![
			("sumSeries", vec![series("a", vec![Some(1.0)])]),
			("diffSeries", vec![series("a", vec![Some(1.0)])]),
			("divideSeries", vec![series("a", vec![Some(1.0)]), series("b", vec![Some(2.0)])]),
			("averageSeries", vec![series("a", vec![Some(1.0)])]),
			("sumSeriesWithWildcards", vec![series("a.b", vec![Some(1.0)]), Value::from(1.0)]),
			(
				"averageSeriesWithWildcards",
				vec![series("a.b", vec![Some(1.0)]), Value::from(1.0)],
			),
			("minSeries", vec![series("a", vec![Some(1.0)])]),
			("maxSeries", vec![series("a", vec![Some(1.0)])]),
			("scale", vec![series("a", vec![Some(1.0)]), Value::from(2.0)]),
			("offset", vec![series("a", vec![Some(1.0)]), Value::from(2.0)]),
			("derivative", vec![series("a", vec![Some(1.0)])]),
			("integral", vec![series("a", vec![Some(1.0)])]),
			("nonNegativeDerivative", vec![series("a", vec![Some(1.0)])]),
			("log", vec![series("a", vec![Some(1.0)])]),
			("summarize", vec![series("a", vec![Some(1.0)]), Value::from("1h")]),
			("hitcount", vec![series("a", vec![Some(1.0)]), Value::from("1h")]),
			("movingAverage", vec![series("a", vec![Some(1.0)]), Value::from(2.0)]),
			("stdev", vec![series("a", vec![Some(1.0)]), Value::from(2.0)]),
			("asPercent", vec![series("a", vec![Some(1.0)]), Value::from(100.0)]),
			("mostDeviant", vec![Value::from(1.0), series("a", vec![Some(1.0)])]),
			("highestCurrent", vec![series("a", vec![Some(1.0)]), Value::from(1.0)]),
			("lowestCurrent", vec![series("a", vec![Some(1.0)]), Value::from(1.0)]),
			("highestMax", vec![series("a", vec![Some(1.0)]), Value::from(1.0)]),
			("currentAbove", vec![series("a", vec![Some(1.0)]), Value::from(1.0)]),
			("currentBelow", vec![series("a", vec![Some(1.0)]), Value::from(1.0)]),
			("highestAverage", vec![series("a", vec![Some(1.0)]), Value::from(1.0)]),
			("lowestAverage", vec![series("a", vec![Some(1.0)]), Value::from(1.0)]),
			("averageAbove", vec![series("a", vec![Some(1.0)]), Value::from(1.0)]),
			("averageBelow", vec![series("a", vec![Some(1.0)]), Value::from(1.0)]),
			("maximumAbove", vec![series("a", vec![Some(1.0)]), Value::from(1.0)]),
			("maximumBelow", vec![series("a", vec![Some(1.0)]), Value::from(1.0)]),
			("nPercentile", vec![series("a", vec![Some(1.0)]), Value::from(50.0)]),
			("limit", vec![series("a", vec![Some(1.0)]), Value::from(1.0)]),
			("sortByMaxima", vec![series("a", vec![Some(1.0)])]),
			("sortByMinima", vec![series("a", vec![Some(1.0)])]),
			("alias", vec![series("a", vec![Some(1.0)]), Value::from("label")]),
			("color", vec![series("a", vec![Some(1.0)]), Value::from("red")]),
			("cumulative", vec![series("a", vec![Some(1.0)])]),
			("keepLastValue", vec![series("a", vec![Some(1.0)])]),
			("drawAsInfinite", vec![series("a", vec![Some(1.0)])]),
			("secondYAxis", vec![series("a", vec![Some(1.0)])]),
			("lineWidth", vec![series("a", vec![Some(1.0)]), Value::from(2.0)]),
			("dashed", vec![series("a", vec![Some(1.0)])]),
			("substr", vec![series("a.b", vec![Some(1.0)])]),
			("group", vec![series("a", vec![Some(1.0)])]),
			("exclude", vec![series("a", vec![Some(1.0)]), Value::from("b")]),
			("constantLine", vec![Value::from(1.0)]),
			("threshold", vec![Value::from(1.0)]),
		];
		for (name, args) in calls {
			let out = run(&ctx, name, args);
			assert!(out.is_ok(), "function {name} failed: {:?}", out.err());
		}
	}
}
