//! Network Module
//!
//! The TCP transport around the responder.
//!
//! ## Architecture
//! - Single acceptor thread
//! - Fixed pool of worker threads fed over a bounded channel
//! - One reply per 48-byte request header, no session state
//! - Shutdown closes live sockets through a registry of stream handles

mod server;
mod connection;
mod registry;

pub use server::Server;
pub use connection::Connection;
