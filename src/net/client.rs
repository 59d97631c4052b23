use parking_lot::Mutex;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

/// The process-wide registry of connected stream clients.
///
/// Every stream connection registers itself on accept and deregisters when
/// its guard drops. Pausing stops every registered reader from pulling
/// further bytes off its socket, which pushes TCP backpressure onto the
/// peers; datagram listeners have no backpressure channel and are exempt.
/// Connections accepted while paused start paused.
pub struct ClientRegistry {
	/// Connected stream clients, by registration id
	clients: Mutex<HashMap<u64, (&'static str, SocketAddr)>>,
	/// The next registration id
	next: AtomicU64,
	/// The effective pause state, observed by every stream reader
	paused: watch::Sender<bool>,
}

impl Default for ClientRegistry {
	fn default() -> Self {
		ClientRegistry {
			clients: Mutex::new(HashMap::new()),
			next: AtomicU64::new(0),
			paused: watch::channel(false).0,
		}
	}
}

impl ClientRegistry {
	/// Create a new empty registry
	pub fn new() -> Self {
		ClientRegistry::default()
	}

	/// Track a newly accepted stream connection
	pub fn register(self: &Arc<Self>, kind: &'static str, peer: SocketAddr) -> ClientGuard {
		let id = self.next.fetch_add(1, Ordering::Relaxed);
		self.clients.lock().insert(id, (kind, peer));
		ClientGuard {
			registry: self.clone(),
			id,
			paused: self.paused.subscribe(),
		}
	}

	/// The number of connected stream clients
	pub fn len(&self) -> usize {
		self.clients.lock().len()
	}

	/// Check whether the registry holds no clients
	pub fn is_empty(&self) -> bool {
		self.clients.lock().is_empty()
	}

	/// The effective pause state
	pub fn paused(&self) -> bool {
		*self.paused.borrow()
	}

	/// Stop every registered client from reading further bytes. Idempotent.
	pub fn pause_all(&self) {
		if !self.paused.send_replace(true) {
			info!("Pausing all {} connected clients", self.len());
		}
	}

	/// Let every registered client read again. Idempotent.
	pub fn resume_all(&self) {
		if self.paused.send_replace(false) {
			info!("Resuming all {} connected clients", self.len());
		}
	}
}

/// The registry entry for one stream connection. Dropping the guard, cleanly
/// or not, removes the connection from the registry.
pub struct ClientGuard {
	registry: Arc<ClientRegistry>,
	id: u64,
	paused: watch::Receiver<bool>,
}

impl ClientGuard {
	/// Park this reader until ingestion is resumed.
	///
	/// While parked, no bytes are pulled off the socket and the kernel
	/// window fills up against the peer.
	pub async fn ready(&mut self) {
		// This only fails if the registry itself has gone away
		let _ = self.paused.wait_for(|paused| !*paused).await;
	}
}

impl Drop for ClientGuard {
	fn drop(&mut self) {
		self.registry.clients.lock().remove(&self.id);
	}
}
