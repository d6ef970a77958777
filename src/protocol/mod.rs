//! Protocol Module
//!
//! Decodes iSCSI request headers and synthesizes acknowledgment headers.
//!
//! ## Header Format (Basic Header Segment, 48 bytes, big-endian)
//! ```text
//! ┌────────┬────────┬────────────┬──────────────┬──────────┬──────────────┬──────────┐
//! │ Op (1) │ Fl (1) │ ITT (4)    │ Data/Len (4) │ CID (4)  │ LUN (8)      │ zero (26)│
//! └────────┴────────┴────────────┴──────────────┴──────────┴──────────────┴──────────┘
//!   0        1        2            6              10         14             22..48
//! ```
//!
//! ### Request → Reply
//! - 0x03 Login Request   → 0x23 Login Response,  data 0
//! - 0x01 SCSI Command    → 0x21 SCSI Response,   data 8 (placeholder residual)
//! - 0x06 Logout Request  → 0x26 Logout Response, data 0
//! - anything else        → 0x20 NOP-In,          data 1

mod header;
mod request;
mod response;
mod codec;

pub use header::{Header, HEADER_SIZE, WIRE_FIELDS_LEN};
pub use request::RequestOpcode;
pub use response::{
    Reply, ReplyKind, ResponseOpcode, COMMAND_RESIDUAL_PLACEHOLDER, REJECT_REASON_UNSUPPORTED,
};
pub use codec::{
    build_reply, decode_header, encode_header, handle, read_frame, read_header, write_frame,
    write_header, Exchange,
};
