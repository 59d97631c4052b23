use crate::fnc::util::math::lcm;
use crate::series::TimeSeries;

/// The result of aligning a set of series onto a common step and window
#[derive(Debug)]
pub struct Normalized {
	pub series: Vec<TimeSeries>,
	pub start: i64,
	pub end: i64,
	pub step: i64,
}

/// Align one or more groups of series onto a common step and window.
///
/// The common step is the least common multiple of every input step, and each
/// series is consolidated up to it. The window spans the earliest start to
/// the latest end, trimmed so that its width is a multiple of the common
/// step. Returns `None` when the groups hold no series at all, in which case
/// a combining function produces an empty result.
///
/// Aligned series may still differ in length at their original endpoints;
/// combining functions iterate columns up to the shortest series.
pub fn normalize(groups: Vec<Vec<TimeSeries>>) -> Option<Normalized> {
	let mut series = groups.into_iter().flatten().collect::<Vec<_>>();
	let step = series.iter().map(|s| s.step).reduce(lcm)?;
	for s in series.iter_mut() {
		s.consolidate((step / s.step) as usize);
	}
	let start = series.iter().map(|s| s.start).min()?;
	let end = series.iter().map(|s| s.end).max()?;
	let end = end - (end - start) % step;
	Some(Normalized {
		series,
		start,
		end,
		step,
	})
}
