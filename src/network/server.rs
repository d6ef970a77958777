//! TCP Server
//!
//! Accepts connections and dispatches them to worker threads.

use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, Sender, TrySendError};

use crate::config::Config;
use crate::error::{IscsiError, Result};
use crate::responder::Responder;
use super::registry::Registry;
use super::Connection;

/// How long the acceptor sleeps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// TCP target server
pub struct Server {
    config: Config,
    responder: Responder,
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
    registry: Arc<Registry>,
}

impl Server {
    /// Validate the config and bind the listen address
    pub fn bind(config: Config) -> Result<Self> {
        config.validate()?;

        let listener = TcpListener::bind(&config.listen_addr).map_err(|e| {
            IscsiError::Network(format!("failed to bind {}: {}", config.listen_addr, e))
        })?;
        // Non-blocking so the accept loop can observe the shutdown flag
        listener.set_nonblocking(true)?;

        let responder = Responder::new(&config);

        Ok(Self {
            config,
            responder,
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
            registry: Arc::new(Registry::default()),
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Flag that stops `run` when set
    ///
    /// Setting it from any thread (or a signal handler) stops accepting,
    /// closes every live connection and drops connections still queued.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Start the server (blocking)
    ///
    /// Returns once shutdown is signalled and every worker has exited.
    pub fn run(&self) -> Result<()> {
        let (tx, rx) = channel::bounded::<TcpStream>(self.config.max_pending_connections);

        let mut workers = Vec::with_capacity(self.config.worker_threads);
        for id in 0..self.config.worker_threads {
            workers.push(self.spawn_worker(id, rx.clone())?);
        }
        drop(rx);

        tracing::info!(
            "Listening on {} with {} workers",
            self.local_addr()?,
            self.config.worker_threads
        );

        let result = self.accept_loop(&tx);

        // Closing the channel lets idle workers exit
        drop(tx);
        let closed = self.registry.close_all();
        if closed > 0 {
            tracing::info!("Closed {} active connections", closed);
        }
        for worker in workers {
            if worker.join().is_err() {
                tracing::error!("Worker thread panicked");
            }
        }

        result
    }

    fn spawn_worker(&self, id: usize, rx: Receiver<TcpStream>) -> Result<JoinHandle<()>> {
        let responder = self.responder;
        let read_ms = self.config.read_timeout_ms;
        let write_ms = self.config.write_timeout_ms;
        let shutdown = Arc::clone(&self.shutdown);
        let registry = Arc::clone(&self.registry);

        let handle = thread::Builder::new()
            .name(format!("iscsi-worker-{}", id))
            .spawn(move || {
                for stream in rx.iter() {
                    let worker = Worker {
                        responder,
                        read_ms,
                        write_ms,
                        shutdown: &shutdown,
                        registry: &registry,
                    };
                    worker.serve(stream);
                }
                tracing::trace!("Worker {} exiting", id);
            })?;

        Ok(handle)
    }

    fn accept_loop(&self, tx: &Sender<TcpStream>) -> Result<()> {
        while !self.shutdown.load(Ordering::Relaxed) {
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    // Accepted sockets may inherit the listener's non-blocking mode
                    if let Err(e) = stream.set_nonblocking(false) {
                        tracing::warn!("Dropping {}: {}", addr, e);
                        continue;
                    }
                    match tx.try_send(stream) {
                        Ok(()) => tracing::debug!("Accepted connection from {}", addr),
                        Err(TrySendError::Full(_)) => {
                            tracing::warn!("Rejecting {}: connection queue is full", addr);
                        }
                        Err(TrySendError::Disconnected(_)) => {
                            return Err(IscsiError::Network(
                                "all worker threads have exited".to_string(),
                            ));
                        }
                    }
                }
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(ref e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
            }
        }

        tracing::info!("Shutdown requested, no longer accepting connections");
        Ok(())
    }
}

/// Per-worker settings for serving one connection
struct Worker<'a> {
    responder: Responder,
    read_ms: u64,
    write_ms: u64,
    shutdown: &'a Arc<AtomicBool>,
    registry: &'a Registry,
}

impl Worker<'_> {
    /// Run one connection to completion on the current worker
    fn serve(&self, stream: TcpStream) {
        // Registered before the flag check so a concurrent close_all cannot miss it
        let _registration = match self.registry.register(&stream) {
            Ok(registration) => registration,
            Err(e) => {
                tracing::warn!("Failed to register connection: {}", e);
                return;
            }
        };

        if self.shutdown.load(Ordering::Relaxed) {
            tracing::debug!("Dropping queued connection during shutdown");
            return;
        }

        let mut conn = match Connection::new(stream, self.responder, Arc::clone(self.shutdown)) {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("Failed to set up connection: {}", e);
                return;
            }
        };

        if let Err(e) = conn.set_timeouts(self.read_ms, self.write_ms) {
            tracing::warn!("Failed to set timeouts for {}: {}", conn.peer_addr(), e);
            return;
        }

        if let Err(e) = conn.handle() {
            tracing::debug!("Connection {} ended with error: {}", conn.peer_addr(), e);
        }
    }
}
