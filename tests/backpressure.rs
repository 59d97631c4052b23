mod common;

use common::wait_for;
use pyrite::drain::{self, LogPersister};
use pyrite::net::{self, Ingest};
use pyrite_core::cache::Persist;
use pyrite_core::obs;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};

#[test_log::test(tokio::test)]
async fn a_full_cache_pauses_clients_and_the_drain_resumes_them() {
	// A tiny cache limit so a handful of records crosses the watermark
	let ingest = Ingest::new(10);
	let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
	let addr = listener.local_addr().expect("no local addr");
	tokio::spawn(net::line::serve(listener, ingest.clone()));

	let mut stream = TcpStream::connect(addr).await.expect("connect failed");
	let mut records = String::new();
	for i in 0..16 {
		records.push_str(&format!("metric.{i} 1.0 1700000000\n"));
	}
	stream.write_all(records.as_bytes()).await.expect("write failed");
	stream.flush().await.expect("flush failed");

	// Crossing the high watermark pauses every stream client
	wait_for("the pause switch", || ingest.clients.paused()).await;

	// Once the drain worker catches up, the clients resume and the rest of
	// the pipelined records flow in
	let persister: Arc<dyn Persist> = Arc::new(LogPersister);
	tokio::spawn(drain::run(ingest.clone(), persister));
	wait_for("the resume switch", || !ingest.clients.paused()).await;
	wait_for("all records to arrive", || {
		ingest.counters.value(obs::METRICS_RECEIVED) == 16
	})
	.await;
}

#[test_log::test(tokio::test)]
async fn shutdown_flush_empties_the_cache() {
	let ingest = Ingest::new(1_000_000);
	for i in 0..32 {
		ingest.publish(&format!("metric.{i}"), pyrite_core::series::Datapoint::new(1.0, 1.0));
	}
	assert_eq!(ingest.cache.size(), 32);
	drain::flush(&ingest, &LogPersister);
	assert!(ingest.cache.is_empty());
}
