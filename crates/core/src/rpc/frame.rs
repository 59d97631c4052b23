use crate::cnf::{MAX_FRAME_LENGTH, MAX_LINE_LENGTH};
use tokio_util::codec::{LengthDelimitedCodec, LinesCodec};

/// The framing codec for the batched ingest and cache query protocols.
///
/// Each frame is a 4 byte big-endian length prefix followed by that many
/// bytes of payload. A frame longer than the configured maximum is a
/// protocol error; the decoder surfaces it as an I/O error, which closes
/// the offending connection without affecting other peers.
pub fn codec() -> LengthDelimitedCodec {
	LengthDelimitedCodec::builder()
		.big_endian()
		.length_field_type::<u32>()
		.max_frame_length(*MAX_FRAME_LENGTH)
		.new_codec()
}

/// The framing codec for the line ingest protocol.
///
/// Records are newline-terminated. A record longer than the configured
/// maximum is a protocol error for that connection.
pub fn line_codec() -> LinesCodec {
	LinesCodec::new_with_max_length(*MAX_LINE_LENGTH)
}
