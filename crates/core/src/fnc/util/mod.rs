use crate::err::Error;

pub mod math;

/// Parse a human time offset such as `1h`, `30min` or `7d` into seconds.
///
/// A leading sign is ignored; only the magnitude of an offset is meaningful
/// to the functions which take one.
pub(crate) fn parse_interval(name: &str, arg: &str) -> Result<i64, Error> {
	let trimmed = arg.trim().trim_start_matches(['+', '-']);
	match humantime::parse_duration(trimmed) {
		Ok(duration) => Ok(duration.as_secs() as i64),
		Err(_) => Err(Error::InvalidArguments {
			name: name.to_owned(),
			message: format!("Expected a time offset such as '1h' or '7d', got '{arg}'."),
		}),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn intervals_parse_to_seconds() {
		assert_eq!(parse_interval("summarize", "1h").expect("interval was valid"), 3600);
		assert_eq!(parse_interval("summarize", "1d").expect("interval was valid"), 86400);
		assert_eq!(parse_interval("timeShift", "-7d").expect("interval was valid"), 604800);
		assert_eq!(parse_interval("timeShift", "30min").expect("interval was valid"), 1800);
	}

	#[test]
	fn nonsense_intervals_are_rejected() {
		assert!(parse_interval("summarize", "soon").is_err());
		assert!(parse_interval("summarize", "").is_err());
	}
}
