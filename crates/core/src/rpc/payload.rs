use crate::err::Error;
use crate::series::Datapoint;

/// One element of a batched ingest payload: a metric name with a single
/// `(timestamp, value)` pair.
pub type BatchItem = (String, (f64, f64));

/// Decode the payload of a batched ingest frame.
///
/// The payload is a serialized list of `(metric, (timestamp, value))` pairs.
/// A payload which does not decode as a whole is discarded by the listener;
/// there is no partial decode.
pub fn decode_batch(payload: &[u8]) -> Result<Vec<BatchItem>, Error> {
	bincode::deserialize(payload).map_err(|e| Error::PayloadDecode {
		message: e.to_string(),
	})
}

/// Encode a batched ingest payload
pub fn encode_batch(items: &[BatchItem]) -> Result<Vec<u8>, Error> {
	bincode::serialize(items).map_err(|e| Error::PayloadEncode {
		message: e.to_string(),
	})
}

/// Encode a cache query response: a serialized list of `(timestamp, value)`
/// pairs, empty for an unknown metric.
pub fn encode_points(points: &[Datapoint]) -> Result<Vec<u8>, Error> {
	bincode::serialize(points).map_err(|e| Error::PayloadEncode {
		message: e.to_string(),
	})
}

/// Decode a cache query response
pub fn decode_points(payload: &[u8]) -> Result<Vec<Datapoint>, Error> {
	bincode::deserialize(payload).map_err(|e| Error::PayloadDecode {
		message: e.to_string(),
	})
}
