//! Configuration for the iSCSI target
//!
//! Centralized configuration with sensible defaults.

use std::net::SocketAddr;

use crate::error::{IscsiError, Result};
use crate::protocol::COMMAND_RESIDUAL_PLACEHOLDER;

/// Main configuration for a target instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address (3260 is the iSCSI well-known port)
    pub listen_addr: String,

    /// Number of worker threads serving connections
    pub worker_threads: usize,

    /// Accepted connections allowed to wait for a free worker
    pub max_pending_connections: usize,

    /// Connection read timeout (milliseconds, 0 disables)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 disables)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Responder Configuration
    // -------------------------------------------------------------------------
    /// Residual count reported in every SCSI Command Response.
    /// Stands in for a real, command-dependent length.
    pub command_residual: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:3260".to_string(),
            worker_threads: 4,
            max_pending_connections: 1024,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
            command_residual: COMMAND_RESIDUAL_PLACEHOLDER,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the config describes a runnable target
    pub fn validate(&self) -> Result<()> {
        if self.worker_threads == 0 {
            return Err(IscsiError::Config(
                "worker_threads must be at least 1".to_string(),
            ));
        }
        if self.max_pending_connections == 0 {
            return Err(IscsiError::Config(
                "max_pending_connections must be at least 1".to_string(),
            ));
        }
        self.listen_addr.parse::<SocketAddr>().map_err(|e| {
            IscsiError::Config(format!("invalid listen address '{}': {}", self.listen_addr, e))
        })?;
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the number of worker threads
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count;
        self
    }

    /// Set how many accepted connections may queue for a worker
    pub fn max_pending_connections(mut self, count: usize) -> Self {
        self.config.max_pending_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the residual count reported for SCSI commands
    pub fn command_residual(mut self, residual: u32) -> Self {
        self.config.command_residual = residual;
        self
    }

    /// Finish building the config
    pub fn build(self) -> Config {
        self.config
    }
}
