use super::{ClientGuard, Ingest};
use anyhow::Result;
use futures_util::StreamExt;
use pyrite_core::obs;
use pyrite_core::rpc::{frame, line};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::FramedRead;

/// Accept line-protocol connections until the listener task is aborted
pub async fn serve(listener: TcpListener, ingest: Arc<Ingest>) {
	loop {
		match listener.accept().await {
			Ok((stream, peer)) => {
				tokio::spawn(accept(stream, peer, ingest.clone()));
			}
			Err(error) => {
				error!("Line listener failed to accept a connection: {error}");
			}
		}
	}
}

async fn accept(stream: TcpStream, peer: SocketAddr, ingest: Arc<Ingest>) {
	debug!("Line connection with {peer} established");
	let guard = ingest.clients.register("line", peer);
	match handle(stream, peer, &ingest, guard).await {
		Ok(()) => debug!("Line connection with {peer} closed cleanly"),
		Err(error) => debug!("Line connection with {peer} lost: {error}"),
	}
}

async fn handle(
	stream: TcpStream,
	peer: SocketAddr,
	ingest: &Ingest,
	mut guard: ClientGuard,
) -> Result<()> {
	let mut records = FramedRead::new(stream, frame::line_codec());
	loop {
		// Flow control: stop reading while ingestion is paused
		guard.ready().await;
		let Some(record) = records.next().await else {
			break;
		};
		match line::parse_record(&record?) {
			Ok((metric, point)) => {
				if ingest.publish(&metric, point) {
					ingest.counters.increment(obs::METRICS_RECEIVED);
				}
			}
			Err(_) => {
				warn!("Invalid line received from client {peer}, ignoring");
			}
		}
	}
	Ok(())
}
