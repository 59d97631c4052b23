use crate::err::Error;
use crate::series::TimeSeries;

/// The seam through which series functions re-enter the query evaluator.
///
/// `timeShift` re-evaluates the path expression which produced a series over
/// a shifted window. The evaluator itself lives outside this crate, so the
/// rendering layer attaches an implementation of this trait to the context
/// before invoking any function which needs it.
pub trait Evaluate {
	/// Evaluate a path expression over the context window
	fn evaluate(&self, ctx: &Context, expr: &str) -> Result<Vec<TimeSeries>, Error>;
}

/// The context of a single query evaluation
#[derive(Clone, Copy)]
pub struct Context<'a> {
	/// The start of the requested window, in seconds since the epoch
	start: i64,
	/// The end of the requested window, in seconds since the epoch
	end: i64,
	/// The attached evaluator, if any
	evaluator: Option<&'a dyn Evaluate>,
}

impl<'a> Context<'a> {
	/// Create a new context for the given request window
	pub fn new(start: i64, end: i64) -> Self {
		Context {
			start,
			end,
			evaluator: None,
		}
	}

	/// Attach a re-entrant evaluator to this context
	pub fn with_evaluator(mut self, evaluator: &'a dyn Evaluate) -> Self {
		self.evaluator = Some(evaluator);
		self
	}

	/// The start of the requested window
	pub fn start(&self) -> i64 {
		self.start
	}

	/// The end of the requested window
	pub fn end(&self) -> i64 {
		self.end
	}

	/// A copy of this context with the window shifted back by `delta` seconds
	pub fn shifted(&self, delta: i64) -> Self {
		Context {
			start: self.start - delta,
			end: self.end - delta,
			evaluator: self.evaluator,
		}
	}

	/// Re-evaluate a path expression over this context window
	pub fn evaluate(&self, expr: &str) -> Result<Vec<TimeSeries>, Error> {
		match self.evaluator {
			Some(evaluator) => evaluator.evaluate(self, expr),
			None => Err(Error::EvaluatorUnavailable),
		}
	}
}
