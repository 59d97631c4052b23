//! The listener set: three ingest protocols and the cache query handler,
//! sharing one client registry, one metric cache and one counter table.

use crate::cli::StartCommandArguments;
use crate::drain::{self, LogPersister};
use anyhow::Result;
use pyrite_core::cache::{MetricCache, Persist};
use pyrite_core::cnf::{CACHE_LOW_WATERMARK, SERVER_NAME};
use pyrite_core::obs::Counters;
use pyrite_core::series::Datapoint;
use std::sync::Arc;
use tokio::net::{TcpListener, UdpSocket};

pub use self::client::{ClientGuard, ClientRegistry};

pub mod batch;
pub mod client;
pub mod datagram;
pub mod line;
pub mod query;

/// The shared state of the ingestion core, passed by reference into every
/// listener.
pub struct Ingest {
	/// The pending write-back buffer
	pub cache: Arc<MetricCache>,
	/// The instrumentation counter table
	pub counters: Arc<Counters>,
	/// The connected stream clients and their pause switch
	pub clients: Arc<ClientRegistry>,
	/// Pause ingestion when the cache grows past this many datapoints
	high_watermark: usize,
	/// Resume ingestion once the cache falls back below this
	low_watermark: usize,
}

impl Ingest {
	/// Create the shared ingestion state for the given cache limit
	pub fn new(max_cache_size: usize) -> Arc<Self> {
		let low_watermark = (max_cache_size as f64 * *CACHE_LOW_WATERMARK) as usize;
		Arc::new(Ingest {
			cache: Arc::new(MetricCache::new()),
			counters: Arc::new(Counters::new()),
			clients: Arc::new(ClientRegistry::new()),
			high_watermark: max_cache_size,
			low_watermark,
		})
	}

	/// The shared post-parse publish path.
	///
	/// NaN values are absent and never enter the cache; everything else is
	/// appended to the metric's pending list. Returns whether the datapoint
	/// was stored. Crossing the cache high watermark pauses every stream
	/// client until the drain worker catches up.
	pub fn publish(&self, metric: &str, point: Datapoint) -> bool {
		if point.is_absent() {
			trace!("Dropping NaN value for {metric}");
			return false;
		}
		self.cache.store(metric, point);
		if self.cache.size() > self.high_watermark && !self.clients.paused() {
			warn!(
				"Cache size {} crossed the high watermark of {}",
				self.cache.size(),
				self.high_watermark
			);
			self.clients.pause_all();
		}
		true
	}

	/// Resume paused clients once the cache has drained below the low
	/// watermark
	pub fn maybe_resume(&self) {
		if self.clients.paused() && self.cache.size() < self.low_watermark {
			self.clients.resume_all();
		}
	}
}

/// Bind the configured listeners, run until interrupted, then flush the
/// cache to the persister
pub async fn init(args: StartCommandArguments) -> Result<()> {
	let StartCommandArguments {
		bind,
		line_port,
		udp_port,
		batch_port,
		query_port,
		max_cache_size,
		..
	} = args;
	let ingest = Ingest::new(max_cache_size as usize);
	let persister: Arc<dyn Persist> = Arc::new(LogPersister);
	let mut tasks = Vec::new();
	if let Some(port) = line_port {
		let listener = TcpListener::bind((bind, port)).await?;
		info!("Started line listener on {}", listener.local_addr()?);
		tasks.push(tokio::spawn(line::serve(listener, ingest.clone())));
	}
	if let Some(port) = udp_port {
		let socket = UdpSocket::bind((bind, port)).await?;
		info!("Started datagram listener on {}", socket.local_addr()?);
		tasks.push(tokio::spawn(datagram::serve(socket, ingest.clone())));
	}
	if let Some(port) = batch_port {
		let listener = TcpListener::bind((bind, port)).await?;
		info!("Started batch listener on {}", listener.local_addr()?);
		tasks.push(tokio::spawn(batch::serve(listener, ingest.clone())));
	}
	if let Some(port) = query_port {
		let listener = TcpListener::bind((bind, port)).await?;
		info!("Started cache query handler on {}", listener.local_addr()?);
		tasks.push(tokio::spawn(query::serve(listener, ingest.clone())));
	}
	if tasks.is_empty() {
		warn!("No listener ports were configured");
	}
	tasks.push(tokio::spawn(drain::run(ingest.clone(), persister.clone())));
	tasks.push(tokio::spawn(drain::record(ingest.clone())));
	// Run until the process is asked to stop
	tokio::signal::ctrl_c().await?;
	info!("{SERVER_NAME} shutting down");
	for task in &tasks {
		task.abort();
	}
	// Hand everything still pending to the persister before exiting
	drain::flush(&ingest, &*persister);
	info!("All pending datapoints flushed");
	Ok(())
}
