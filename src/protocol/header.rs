//! Header definition
//!
//! The fixed-size control structure exchanged at the start of every message.

use serde::{Deserialize, Serialize};

/// Size of a header on the wire, in bytes
pub const HEADER_SIZE: usize = 48;

/// Bytes carrying named fields; the rest of the header is zero on encode
/// and ignored on decode.
pub const WIRE_FIELDS_LEN: usize = 22;

/// One decoded iSCSI header
///
/// Field order is the wire order. The serde derive is what the codec
/// serializes, so fields must not be reordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Header {
    /// Opcode identifying the message kind
    pub operation: u8,

    /// Opcode-specific flag bits, carried but not interpreted
    pub flags: u8,

    /// Initiator task tag, echoed in every reply
    pub task_tag: u32,

    /// Residual count, expected data length or error code, depending on `operation`
    pub data_or_length: u32,

    /// Connection identifier within the session
    pub connection_id: u32,

    /// Logical unit number
    pub logical_unit: u64,
}
