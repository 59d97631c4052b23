use crate::err::Error;
use crate::series::Datapoint;

/// Parse one record of the line protocol.
///
/// A record is `metric SP value SP timestamp`, with surrounding whitespace
/// ignored. The value and timestamp are coerced to floating point; anything
/// else is a record-level error which the listener drops without closing
/// the connection.
pub fn parse_record(record: &str) -> Result<(String, Datapoint), Error> {
	let mut fields = record.split_whitespace();
	let (metric, value, timestamp) = match (fields.next(), fields.next(), fields.next()) {
		(Some(metric), Some(value), Some(timestamp)) if fields.next().is_none() => {
			(metric, value, timestamp)
		}
		_ => {
			return Err(Error::RecordParse {
				record: record.trim().to_owned(),
			});
		}
	};
	let value = value.parse::<f64>().map_err(|_| Error::ValueCoercion {
		value: value.to_owned(),
	})?;
	let timestamp = timestamp.parse::<f64>().map_err(|_| Error::ValueCoercion {
		value: timestamp.to_owned(),
	})?;
	Ok((metric.to_owned(), Datapoint::new(timestamp, value)))
}
