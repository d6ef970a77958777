//! Connection Handler
//!
//! Handles individual initiator connections.

use std::io::{BufReader, BufWriter, ErrorKind};
use std::net::TcpStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{IscsiError, Result};
use crate::protocol::{read_frame, write_frame};
use crate::responder::Responder;

/// Handles a single initiator connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Reply builder shared with every other connection
    responder: Responder,

    /// Server-wide shutdown flag, checked between frames
    shutdown: Arc<AtomicBool>,

    /// Peer address for logging
    peer_addr: String,
}

/// Errors that mean the peer went away rather than that something broke
fn is_disconnect(err: &IscsiError) -> bool {
    match err {
        IscsiError::Io(e) => matches!(
            e.kind(),
            ErrorKind::UnexpectedEof
                | ErrorKind::ConnectionReset
                | ErrorKind::ConnectionAborted
                | ErrorKind::BrokenPipe
        ),
        _ => false,
    }
}

/// Read timeouts surface as WouldBlock on Unix and TimedOut on Windows
fn is_timeout(err: &IscsiError) -> bool {
    match err {
        IscsiError::Io(e) => matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut),
        _ => false,
    }
}

impl Connection {
    /// Create a new connection handler
    ///
    /// Sets up buffered I/O
    pub fn new(
        stream: TcpStream,
        responder: Responder,
        shutdown: Arc<AtomicBool>,
    ) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm; replies are small and latency-bound
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            responder,
            shutdown,
            peer_addr,
        })
    }

    /// Configure connection timeouts (0 leaves a direction unbounded)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        let read_stream = self.reader.get_ref();
        let write_stream = self.writer.get_ref();

        if read_ms > 0 {
            read_stream.set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            write_stream.set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }

        Ok(())
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Reads request headers in a loop and sends one reply per header.
    /// Returns when the initiator disconnects, the server shuts down,
    /// or an error occurs.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        loop {
            if self.shutting_down() {
                tracing::debug!("Closing {} for shutdown", self.peer_addr);
                return Ok(());
            }

            let frame = match read_frame(&mut self.reader) {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    tracing::debug!("Initiator {} disconnected", self.peer_addr);
                    return Ok(());
                }
                Err(ref e) if is_disconnect(e) => {
                    tracing::debug!("Connection to {} closed: {}", self.peer_addr, e);
                    return Ok(());
                }
                Err(ref e) if is_timeout(e) => {
                    tracing::debug!("Read timeout for initiator {}", self.peer_addr);
                    return Ok(());
                }
                // The socket was shut down under us by Server::run
                Err(_) if self.shutting_down() => {
                    tracing::debug!("Closing {} for shutdown", self.peer_addr);
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    return Err(e);
                }
            };

            let exchange = match self.responder.handle(&frame) {
                Ok(exchange) => exchange,
                Err(e) => {
                    tracing::warn!("Dropping {} after bad header: {}", self.peer_addr, e);
                    return Err(e);
                }
            };

            tracing::trace!(
                peer = %self.peer_addr,
                request_op = exchange.request.operation,
                reply_op = exchange.reply.operation,
                task_tag = exchange.request.task_tag,
                cid = exchange.request.connection_id,
                lun = exchange.request.logical_unit,
                "Answered request"
            );

            if let Err(e) = write_frame(&mut self.writer, &exchange.encoded) {
                if is_disconnect(&e) || self.shutting_down() {
                    tracing::debug!(
                        "Initiator {} disconnected before reply could be sent: {}",
                        self.peer_addr,
                        e
                    );
                    return Ok(());
                }
                tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
                return Err(e);
            }
        }
    }

    fn shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}
