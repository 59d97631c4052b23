/// The ordinal-rank percentile of a set of present values.
///
/// The values are sorted ascending and the element at rank
/// `round(n * len / 100)` is taken, one-based, with the rank clamped to the
/// slice bounds.
pub fn ordinal(values: &mut [f64], n: f64) -> Option<f64> {
	if values.is_empty() {
		return None;
	}
	values.sort_by(|a, b| a.total_cmp(b));
	let rank = (n * values.len() as f64 / 100.0 + 0.5).floor() as i64;
	let index = (rank - 1).clamp(0, values.len() as i64 - 1) as usize;
	Some(values[index])
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ranks_are_one_based_and_clamped() {
		let mut values = vec![15.0, 20.0, 35.0, 40.0, 50.0];
		assert_eq!(ordinal(&mut values, 30.0), Some(20.0));
		assert_eq!(ordinal(&mut values, 100.0), Some(50.0));
		assert_eq!(ordinal(&mut values, 1.0), Some(15.0));
	}

	#[test]
	fn empty_input_has_no_percentile() {
		assert_eq!(ordinal(&mut [], 50.0), None);
	}
}
