use once_cell::sync::Lazy;

/// The publicly visible name of the server
pub const SERVER_NAME: &str = "Pyrite";

/// Specifies the maximum size of a single length-prefixed frame on the
/// batched ingest and cache query protocols. A frame larger than this is a
/// protocol error and closes the offending connection.
pub static MAX_FRAME_LENGTH: Lazy<usize> =
	lazy_env_parse!("PYRITE_MAX_FRAME_LENGTH", usize, 1024 * 1024);

/// Specifies the maximum length of a single record on the line protocol.
pub static MAX_LINE_LENGTH: Lazy<usize> = lazy_env_parse!("PYRITE_MAX_LINE_LENGTH", usize, 16384);

/// The fraction of the configured maximum cache size below which paused
/// clients are resumed again.
pub static CACHE_LOW_WATERMARK: Lazy<f64> =
	lazy_env_parse!("PYRITE_CACHE_LOW_WATERMARK", f64, 0.95);

/// Specifies how often, in seconds, the instrumentation counters are drained
/// into the metric cache.
pub static RECORD_INTERVAL: Lazy<u64> = lazy_env_parse!("PYRITE_RECORD_INTERVAL", u64, 60);

/// The instance name under which instrumentation datapoints are recorded.
pub static RECORD_INSTANCE: Lazy<String> =
	Lazy::new(|| std::env::var("PYRITE_INSTANCE").unwrap_or_else(|_| String::from("local")));
