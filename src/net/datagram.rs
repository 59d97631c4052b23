use super::Ingest;
use futures_util::StreamExt;
use pyrite_core::obs;
use pyrite_core::rpc::line;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio_util::codec::BytesCodec;
use tokio_util::udp::UdpFramed;

/// Read line-protocol datagrams until the listener task is aborted.
///
/// Each packet may carry any number of newline-separated records. Datagram
/// peers are not registered for flow control: UDP has no backpressure
/// channel, so pausing would only drop packets in the kernel instead.
pub async fn serve(socket: UdpSocket, ingest: Arc<Ingest>) {
	let mut packets = UdpFramed::new(socket, BytesCodec::new());
	while let Some(packet) = packets.next().await {
		match packet {
			Ok((bytes, peer)) => {
				for record in String::from_utf8_lossy(&bytes).lines() {
					match line::parse_record(record) {
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
			}
			Err(error) => {
				error!("Datagram listener failed to read a packet: {error}");
			}
		}
	}
}
