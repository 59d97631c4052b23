/// The arithmetic mean of the present values
pub trait Mean {
	fn mean(&self) -> Option<f64>;
}

impl Mean for [Option<f64>] {
	fn mean(&self) -> Option<f64> {
		let (mut sum, mut len) = (0.0, 0usize);
		for value in self.iter().flatten() {
			sum += value;
			len += 1;
		}
		match len {
			0 => None,
			_ => Some(sum / len as f64),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn means_ignore_absent_values() {
		assert_eq!([Some(1.0), None, Some(3.0)].mean(), Some(2.0));
		assert_eq!([None::<f64>, None].mean(), None);
		assert_eq!(Vec::<Option<f64>>::new().mean(), None);
	}
}
