use thiserror::Error;

/// An error originating from the metrics pipeline
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// A length-prefixed frame exceeded the configured maximum size
	#[error("Frame of {size} bytes exceeds the maximum of {limit} bytes")]
	FrameTooLarge {
		size: usize,
		limit: usize,
	},

	/// A record on the line protocol could not be parsed
	#[error("Invalid record: {record}")]
	RecordParse {
		record: String,
	},

	/// A record field could not be coerced to a number
	#[error("Couldn't coerce '{value}' to a number")]
	ValueCoercion {
		value: String,
	},

	/// A batched payload could not be decoded
	#[error("Couldn't decode payload: {message}")]
	PayloadDecode {
		message: String,
	},

	/// A payload could not be encoded
	#[error("Couldn't encode payload: {message}")]
	PayloadEncode {
		message: String,
	},

	/// The series function does not exist
	#[error("Invalid series function: {name}. {message}")]
	InvalidFunction {
		name: String,
		message: String,
	},

	/// The series function was invoked with invalid arguments
	#[error("Incorrect arguments for function {name}(). {message}")]
	InvalidArguments {
		name: String,
		message: String,
	},

	/// A re-entrant evaluation was requested on a context without an evaluator
	#[error("No evaluator is attached to this query context")]
	EvaluatorUnavailable,

	/// There was an underlying I/O error
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// A generic error
	#[error("Error: {0}")]
	Thrown(String),
}

impl From<&str> for Error {
	fn from(e: &str) -> Self {
		Error::Thrown(e.to_string())
	}
}
