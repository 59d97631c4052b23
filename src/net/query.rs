use super::{ClientGuard, Ingest};
use anyhow::Result;
use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use pyrite_core::cnf::MAX_FRAME_LENGTH;
use pyrite_core::err::Error;
use pyrite_core::obs;
use pyrite_core::rpc::{frame, payload};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::Framed;

/// Accept cache query connections until the listener task is aborted.
///
/// Requests and responses share the batched protocol's framing: each request
/// frame carries a raw metric name, and each response frame a serialized
/// list of the metric's pending `(timestamp, value)` pairs. A query never
/// drains the cache.
pub async fn serve(listener: TcpListener, ingest: Arc<Ingest>) {
	loop {
		match listener.accept().await {
			Ok((stream, peer)) => {
				tokio::spawn(accept(stream, peer, ingest.clone()));
			}
			Err(error) => {
				error!("Query handler failed to accept a connection: {error}");
			}
		}
	}
}

async fn accept(stream: TcpStream, peer: SocketAddr, ingest: Arc<Ingest>) {
	debug!("Query connection with {peer} established");
	let guard = ingest.clients.register("query", peer);
	match handle(stream, peer, &ingest, guard).await {
		Ok(()) => debug!("Query connection with {peer} closed cleanly"),
		Err(error) => debug!("Query connection with {peer} lost: {error}"),
	}
}

async fn handle(
	stream: TcpStream,
	_peer: SocketAddr,
	ingest: &Ingest,
	mut guard: ClientGuard,
) -> Result<()> {
	let mut framed = Framed::new(stream, frame::codec());
	loop {
		guard.ready().await;
		let Some(request) = framed.next().await else {
			break;
		};
		let metric = String::from_utf8_lossy(&request?).into_owned();
		let points = ingest.cache.get(&metric);
		debug!("Cache query for {metric} returned {} values", points.len());
		let response = payload::encode_points(&points)?;
		if response.len() > *MAX_FRAME_LENGTH {
			return Err(Error::FrameTooLarge {
				size: response.len(),
				limit: *MAX_FRAME_LENGTH,
			}
			.into());
		}
		framed.send(Bytes::from(response)).await?;
		ingest.counters.increment(obs::CACHE_QUERIES);
	}
	Ok(())
}
