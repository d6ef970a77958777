//! Responder Module
//!
//! Applies target configuration on top of the stateless codec.
//!
//! ## Responsibilities
//! - Decode each request header
//! - Pick the reply from the opcode table
//! - Substitute the configured command residual
//! - Encode the reply
//!
//! A `Responder` carries no per-connection or per-session state, so one
//! instance is shared by every worker.

use crate::config::Config;
use crate::error::Result;
use crate::protocol::{
    decode_header, encode_header, Exchange, Reply, COMMAND_RESIDUAL_PLACEHOLDER,
};

/// Builds replies for request headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Responder {
    /// Residual count put in SCSI Command Responses
    command_residual: u32,
}

impl Default for Responder {
    fn default() -> Self {
        Self {
            command_residual: COMMAND_RESIDUAL_PLACEHOLDER,
        }
    }
}

impl Responder {
    /// Create a responder from the target configuration
    pub fn new(config: &Config) -> Self {
        Self {
            command_residual: config.command_residual,
        }
    }

    /// Create a responder reporting `residual` for every SCSI command
    pub fn with_command_residual(residual: u32) -> Self {
        Self {
            command_residual: residual,
        }
    }

    /// Residual count this responder reports for SCSI commands
    pub fn command_residual(&self) -> u32 {
        self.command_residual
    }

    /// Decode → reply → encode for one request header
    pub fn handle(&self, bytes: &[u8]) -> Result<Exchange> {
        let request = decode_header(bytes)?;
        let reply = Reply::for_request(&request)
            .with_command_residual(self.command_residual)
            .to_header();
        let encoded = encode_header(&reply)?;

        Ok(Exchange {
            request,
            reply,
            encoded,
        })
    }
}
