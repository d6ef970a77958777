//! Reply definitions
//!
//! Replies are built as a variant per response kind and only flattened
//! into a wire [`Header`] when they are about to be encoded.

use super::{Header, RequestOpcode};

/// Residual count reported for SCSI commands when nothing better is known.
///
/// Not derived from any transfer; the real value is command-dependent.
pub const COMMAND_RESIDUAL_PLACEHOLDER: u32 = 8;

/// Data field of the reply sent for unsupported requests
pub const REJECT_REASON_UNSUPPORTED: u32 = 1;

/// Response opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ResponseOpcode {
    NopIn = 0x20,
    ScsiResponse = 0x21,
    LoginResponse = 0x23,
    LogoutResponse = 0x26,
}

/// What a reply says, with only the data meaningful to that kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// Acknowledges the start of session negotiation
    LoginResponse,

    /// Acknowledges a SCSI command with a residual count
    CommandResponse { residual: u32 },

    /// Acknowledges a logout request
    LogoutResponse,

    /// Unrecognized or unsupported request
    Reject { reason: u32 },
}

impl ReplyKind {
    /// Get the response opcode
    pub fn opcode(&self) -> ResponseOpcode {
        match self {
            ReplyKind::LoginResponse => ResponseOpcode::LoginResponse,
            ReplyKind::CommandResponse { .. } => ResponseOpcode::ScsiResponse,
            ReplyKind::LogoutResponse => ResponseOpcode::LogoutResponse,
            ReplyKind::Reject { .. } => ResponseOpcode::NopIn,
        }
    }

    /// Value of the overloaded data/length field on the wire
    pub fn data_or_length(&self) -> u32 {
        match self {
            ReplyKind::LoginResponse | ReplyKind::LogoutResponse => 0,
            ReplyKind::CommandResponse { residual } => *residual,
            ReplyKind::Reject { reason } => *reason,
        }
    }
}

/// A reply to one request header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reply {
    pub kind: ReplyKind,

    // Echoed from the request
    pub flags: u8,
    pub task_tag: u32,
    pub connection_id: u32,
    pub logical_unit: u64,
}

impl Reply {
    /// Choose the reply for a request by its opcode
    pub fn for_request(request: &Header) -> Self {
        let kind = match RequestOpcode::from_u8(request.operation) {
            Some(RequestOpcode::LoginRequest) => ReplyKind::LoginResponse,
            Some(RequestOpcode::ScsiCommand) => ReplyKind::CommandResponse {
                residual: COMMAND_RESIDUAL_PLACEHOLDER,
            },
            Some(RequestOpcode::LogoutRequest) => ReplyKind::LogoutResponse,
            None => ReplyKind::Reject {
                reason: REJECT_REASON_UNSUPPORTED,
            },
        };

        Self {
            kind,
            flags: request.flags,
            task_tag: request.task_tag,
            connection_id: request.connection_id,
            logical_unit: request.logical_unit,
        }
    }

    /// Replace the residual of a command response; other kinds are unchanged
    pub fn with_command_residual(mut self, residual: u32) -> Self {
        if let ReplyKind::CommandResponse { .. } = self.kind {
            self.kind = ReplyKind::CommandResponse { residual };
        }
        self
    }

    /// Flatten into the wire header
    pub fn to_header(&self) -> Header {
        Header {
            operation: self.kind.opcode() as u8,
            flags: self.flags,
            task_tag: self.task_tag,
            data_or_length: self.kind.data_or_length(),
            connection_id: self.connection_id,
            logical_unit: self.logical_unit,
        }
    }
}

impl From<Reply> for Header {
    fn from(reply: Reply) -> Self {
        reply.to_header()
    }
}
