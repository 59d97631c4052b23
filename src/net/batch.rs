use super::{ClientGuard, Ingest};
use anyhow::Result;
use futures_util::StreamExt;
use pyrite_core::obs;
use pyrite_core::rpc::{frame, payload};
use pyrite_core::series::Datapoint;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::FramedRead;

/// Accept batched-protocol connections until the listener task is aborted
pub async fn serve(listener: TcpListener, ingest: Arc<Ingest>) {
	loop {
		match listener.accept().await {
			Ok((stream, peer)) => {
				tokio::spawn(accept(stream, peer, ingest.clone()));
			}
			Err(error) => {
				error!("Batch listener failed to accept a connection: {error}");
			}
		}
	}
}

async fn accept(stream: TcpStream, peer: SocketAddr, ingest: Arc<Ingest>) {
	debug!("Batch connection with {peer} established");
	let guard = ingest.clients.register("batch", peer);
	match handle(stream, peer, &ingest, guard).await {
		Ok(()) => debug!("Batch connection with {peer} closed cleanly"),
		Err(error) => debug!("Batch connection with {peer} lost: {error}"),
	}
}

async fn handle(
	stream: TcpStream,
	peer: SocketAddr,
	ingest: &Ingest,
	mut guard: ClientGuard,
) -> Result<()> {
	// An oversize frame surfaces as an error here and closes the connection
	let mut frames = FramedRead::new(stream, frame::codec());
	loop {
		// Flow control: stop reading while ingestion is paused
		guard.ready().await;
		let Some(blob) = frames.next().await else {
			break;
		};
		match payload::decode_batch(&blob?) {
			Ok(items) => {
				// The counter reflects decoded datapoints, before NaN filtering
				ingest.counters.increment_by(obs::METRICS_RECEIVED, items.len() as i64);
				for (metric, (timestamp, value)) in items {
					ingest.publish(&metric, Datapoint::new(timestamp, value));
				}
			}
			Err(_) => {
				warn!("Invalid batch payload received from client {peer}, ignoring");
			}
		}
	}
	Ok(())
}
