use crate::err::Error;
use crate::series::{TimeSeries, Value};

/// The display kind of a value, used in argument error messages
fn kind(value: &Value) -> &'static str {
	match value {
		Value::None => "nothing",
		Value::Number(_) => "a number",
		Value::Strand(_) => "a string",
		Value::Series(_) => "a series list",
	}
}

fn unexpected(name: &str, wanted: &str, found: &Value) -> Error {
	Error::InvalidArguments {
		name: name.to_owned(),
		message: format!("Expected {wanted} but found {}.", kind(found)),
	}
}

fn arity(name: &str, wanted: &str) -> Error {
	Error::InvalidArguments {
		name: name.to_owned(),
		message: format!("Expected {wanted}."),
	}
}

/// A value which can be extracted from a single function argument.
///
/// An omitted trailing argument reaches the conversion as [`Value::None`],
/// which only an `Option` accepts; everything else reports the mismatch.
pub trait FromArg: Sized {
	fn from_arg(name: &str, arg: Value) -> Result<Self, Error>;
}

impl FromArg for Value {
	fn from_arg(_: &str, arg: Value) -> Result<Self, Error> {
		Ok(arg)
	}
}

impl<T: FromArg> FromArg for Option<T> {
	fn from_arg(name: &str, arg: Value) -> Result<Self, Error> {
		match arg {
			Value::None => Ok(None),
			arg => T::from_arg(name, arg).map(Some),
		}
	}
}

impl FromArg for f64 {
	fn from_arg(name: &str, arg: Value) -> Result<Self, Error> {
		match arg {
			Value::Number(v) => Ok(v),
			Value::Strand(ref v) => {
				v.parse::<f64>().map_err(|_| unexpected(name, "a number", &arg))
			}
			_ => Err(unexpected(name, "a number", &arg)),
		}
	}
}

impl FromArg for i64 {
	fn from_arg(name: &str, arg: Value) -> Result<Self, Error> {
		f64::from_arg(name, arg).map(|v| v as i64)
	}
}

impl FromArg for usize {
	fn from_arg(name: &str, arg: Value) -> Result<Self, Error> {
		match f64::from_arg(name, arg)? {
			v if v >= 0.0 => Ok(v as usize),
			_ => Err(arity(name, "a non-negative number")),
		}
	}
}

impl FromArg for String {
	fn from_arg(name: &str, arg: Value) -> Result<Self, Error> {
		match arg {
			Value::Strand(v) => Ok(v),
			_ => Err(unexpected(name, "a string", &arg)),
		}
	}
}

impl FromArg for Vec<TimeSeries> {
	fn from_arg(name: &str, arg: Value) -> Result<Self, Error> {
		match arg {
			Value::Series(v) => Ok(v),
			_ => Err(unexpected(name, "a series list", &arg)),
		}
	}
}

/// A tuple of values which can be extracted from a function argument list.
///
/// Surplus arguments are an arity error; omitted trailing arguments are
/// padded with [`Value::None`], so they only convert where the tuple's
/// element is an `Option`.
pub trait FromArgs: Sized {
	fn from_args(name: &str, args: Vec<Value>) -> Result<Self, Error>;
}

impl FromArgs for Vec<Value> {
	fn from_args(_: &str, args: Vec<Value>) -> Result<Self, Error> {
		Ok(args)
	}
}

impl FromArgs for () {
	fn from_args(name: &str, args: Vec<Value>) -> Result<Self, Error> {
		match args.is_empty() {
			true => Ok(()),
			false => Err(arity(name, "no arguments")),
		}
	}
}

impl<A: FromArg> FromArgs for (A,) {
	fn from_args(name: &str, args: Vec<Value>) -> Result<Self, Error> {
		if args.len() > 1 {
			return Err(arity(name, "at most 1 argument"));
		}
		let mut args = args.into_iter();
		let a = A::from_arg(name, args.next().unwrap_or_default())?;
		Ok((a,))
	}
}

impl<A: FromArg, B: FromArg> FromArgs for (A, B) {
	fn from_args(name: &str, args: Vec<Value>) -> Result<Self, Error> {
		if args.len() > 2 {
			return Err(arity(name, "at most 2 arguments"));
		}
		let mut args = args.into_iter();
		let a = A::from_arg(name, args.next().unwrap_or_default())?;
		let b = B::from_arg(name, args.next().unwrap_or_default())?;
		Ok((a, b))
	}
}

impl<A: FromArg, B: FromArg, C: FromArg> FromArgs for (A, B, C) {
	fn from_args(name: &str, args: Vec<Value>) -> Result<Self, Error> {
		if args.len() > 3 {
			return Err(arity(name, "at most 3 arguments"));
		}
		let mut args = args.into_iter();
		let a = A::from_arg(name, args.next().unwrap_or_default())?;
		let b = B::from_arg(name, args.next().unwrap_or_default())?;
		let c = C::from_arg(name, args.next().unwrap_or_default())?;
		Ok((a, b, c))
	}
}
