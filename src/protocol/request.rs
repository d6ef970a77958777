//! Request opcodes
//!
//! The initiator opcodes the responder recognizes.

/// Request opcodes with a dedicated reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RequestOpcode {
    ScsiCommand = 0x01,
    LoginRequest = 0x03,
    LogoutRequest = 0x06,
}

impl RequestOpcode {
    /// Look up an opcode by exact value
    ///
    /// Returns `None` for every unrecognized byte.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(RequestOpcode::ScsiCommand),
            0x03 => Some(RequestOpcode::LoginRequest),
            0x06 => Some(RequestOpcode::LogoutRequest),
            _ => None,
        }
    }
}
