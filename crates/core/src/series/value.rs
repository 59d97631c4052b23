use crate::series::TimeSeries;

/// An argument or result of a series function.
///
/// The rendering layer parses each `&target=` fragment into a function call
/// whose arguments are numbers, quoted strings, or previously retrieved
/// series lists, all of which travel through this type.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
	#[default]
	None,
	Number(f64),
	Strand(String),
	Series(Vec<TimeSeries>),
}

impl Value {
	/// Take the series list out of this value, if it holds one
	pub fn into_series(self) -> Option<Vec<TimeSeries>> {
		match self {
			Value::Series(v) => Some(v),
			_ => None,
		}
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Number(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Number(v as f64)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Strand(v.to_owned())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Strand(v)
	}
}

impl From<TimeSeries> for Value {
	fn from(v: TimeSeries) -> Self {
		Value::Series(vec![v])
	}
}

impl From<Vec<TimeSeries>> for Value {
	fn from(v: Vec<TimeSeries>) -> Self {
		Value::Series(v)
	}
}
