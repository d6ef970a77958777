//! # iscsi-responder
//!
//! A stateless iSCSI header responder:
//! - Decodes the 48-byte request header (big-endian, fixed layout)
//! - Classifies it by opcode with a static table
//! - Builds a reply that echoes the task tag, connection ID and LUN
//! - Encodes the reply back to 48 bytes
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Target                              │
//! │             (acceptor + worker threads)                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  48-byte frames
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Responder                                │
//! │              (configured residual)                           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Codec    │          │    Reply    │
//!   │ (decode/enc)│          │   (table)   │
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! Nothing below the network layer keeps state; every call is independent.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod responder;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{IscsiError, Result};
pub use config::Config;
pub use protocol::{Exchange, Header};
pub use responder::Responder;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of iscsi-responder
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
