//! Length-prefixed framing
//!
//! Every message in both directions is `[u32 big-endian length][payload]`.
//! The codec never looks inside the payload.

use spire_core::{Result, SpireError};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Size of the length prefix
pub const HEADER_LEN: usize = 4;

/// Sanity limit on a single frame (64 MiB)
pub const MAX_FRAME_LEN: u32 = 64 * 1024 * 1024;

/// Prefix `payload` with its big-endian length
pub fn encode_frame(payload: &[u8]) -> Result<Vec<u8>> {
    let len = u32::try_from(payload.len()).map_err(|_| {
        SpireError::Framing(format!("payload of {} bytes exceeds u32 range", payload.len()))
    })?;
    if len > MAX_FRAME_LEN {
        return Err(SpireError::Framing(format!(
            "Frame too large: {} > {}",
            len, MAX_FRAME_LEN
        )));
    }

    let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(payload);
    Ok(buf)
}

/// Parse a length prefix
pub fn decode_header(header: [u8; HEADER_LEN]) -> u32 {
    u32::from_be_bytes(header)
}

/// Write one frame and flush
///
/// `write_all` keeps writing until the whole frame is out or the stream fails.
pub async fn write_frame<W: AsyncWrite + Unpin>(writer: &mut W, payload: &[u8]) -> Result<()> {
    let frame = encode_frame(payload)?;
    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one frame
///
/// Returns `Ok(None)` when the peer closes before a complete frame arrived.
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Option<Vec<u8>>> {
    let mut header = [0u8; HEADER_LEN];
    if !read_exact_or_eof(reader, &mut header).await? {
        return Ok(None);
    }

    let len = decode_header(header);
    if len > MAX_FRAME_LEN {
        return Err(SpireError::Framing(format!(
            "Frame too large: {} > {}",
            len, MAX_FRAME_LEN
        )));
    }

    let mut payload = vec![0u8; len as usize];
    if !read_exact_or_eof(reader, &mut payload).await? {
        return Ok(None);
    }
    Ok(Some(payload))
}

/// Fill `buf` completely; `false` if the stream ended first
async fn read_exact_or_eof<R: AsyncRead + Unpin>(reader: &mut R, buf: &mut [u8]) -> Result<bool> {
    let mut off = 0usize;
    while off < buf.len() {
        match reader.read(&mut buf[off..]).await? {
            0 => return Ok(false),
            n => off += n,
        }
    }
    Ok(true)
}
