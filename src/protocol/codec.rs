//! Protocol codec
//!
//! Encoding and decoding functions for the 48-byte header.
//!
//! ## Wire Format
//! ```text
//! offset  width  field
//!      0      1  operation
//!      1      1  flags
//!      2      4  task_tag
//!      6      4  data_or_length
//!     10      4  connection_id
//!     14      8  logical_unit
//!     22     26  (zero on encode, ignored on decode)
//! ```
//!
//! All integers are big-endian with no padding between fields. Bytes past
//! the first 48 belong to the data segment and are left to the caller.

use std::io::{ErrorKind, Read, Write};

use bincode::Options;
use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{IscsiError, Result};
use super::{Header, Reply, HEADER_SIZE};

/// Fixed-width big-endian integers in declaration order, nothing else
fn wire_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_big_endian()
        .with_fixint_encoding()
        .allow_trailing_bytes()
}

// =============================================================================
// Header Encoding/Decoding
// =============================================================================

/// Decode a header from the first 48 bytes of `bytes`
pub fn decode_header(bytes: &[u8]) -> Result<Header> {
    if bytes.len() < HEADER_SIZE {
        return Err(IscsiError::IncompleteMessage {
            expected: HEADER_SIZE,
            actual: bytes.len(),
        });
    }

    wire_options()
        .deserialize(&bytes[..HEADER_SIZE])
        .map_err(|e| IscsiError::MalformedHeader(e.to_string()))
}

/// Encode a header to exactly 48 bytes
pub fn encode_header(header: &Header) -> Result<Bytes> {
    let mut buf = BytesMut::with_capacity(HEADER_SIZE);
    wire_options()
        .serialize_into((&mut buf).writer(), header)
        .map_err(|e| IscsiError::EncodingFailure(e.to_string()))?;

    if buf.len() > HEADER_SIZE {
        return Err(IscsiError::EncodingFailure(format!(
            "header image is {} bytes, exceeds {}",
            buf.len(),
            HEADER_SIZE
        )));
    }
    buf.resize(HEADER_SIZE, 0);

    Ok(buf.freeze())
}

/// Build the reply header for a decoded request
///
/// Total: every opcode maps to some reply.
pub fn build_reply(request: &Header) -> Header {
    Reply::for_request(request).into()
}

// =============================================================================
// Request Handling
// =============================================================================

/// Outcome of handling one request header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// The decoded request
    pub request: Header,

    /// The reply built for it
    pub reply: Header,

    /// Wire image of `reply`, always 48 bytes
    pub encoded: Bytes,
}

/// Decode a request, build its reply and encode the reply
pub fn handle(bytes: &[u8]) -> Result<Exchange> {
    let request = decode_header(bytes)?;
    let reply = build_reply(&request);
    let encoded = encode_header(&reply)?;

    Ok(Exchange {
        request,
        reply,
        encoded,
    })
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one raw header from a stream
///
/// Returns `Ok(None)` if the stream ends cleanly before the first byte.
/// A stream that ends partway through a header is a `MalformedHeader`.
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Option<[u8; HEADER_SIZE]>> {
    let mut frame = [0u8; HEADER_SIZE];
    let mut filled = 0;

    while filled < HEADER_SIZE {
        match reader.read(&mut frame[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => {
                return Err(IscsiError::MalformedHeader(format!(
                    "stream ended after {} of {} header bytes",
                    filled, HEADER_SIZE
                )))
            }
            Ok(n) => filled += n,
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(Some(frame))
}

/// Read and decode one header from a stream
pub fn read_header<R: Read>(reader: &mut R) -> Result<Option<Header>> {
    match read_frame(reader)? {
        Some(frame) => decode_header(&frame).map(Some),
        None => Ok(None),
    }
}

/// Write an already encoded header to a stream
pub fn write_frame<W: Write>(writer: &mut W, frame: &[u8]) -> Result<()> {
    writer.write_all(frame)?;
    writer.flush()?;
    Ok(())
}

/// Encode a header and write it to a stream
pub fn write_header<W: Write>(writer: &mut W, header: &Header) -> Result<()> {
    let bytes = encode_header(header)?;
    write_frame(writer, &bytes)
}
