//! The wire protocols spoken by the listeners: newline-delimited text
//! records, and length-prefixed binary frames shared by the batched ingest
//! and the cache query handler.

pub mod frame;
pub mod line;
pub mod payload;
