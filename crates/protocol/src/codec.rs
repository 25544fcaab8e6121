use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::io::{Read, Write};

/// Largest frame accepted from a peer.
pub const MAX_FRAME_LEN: usize = 64 * 1024 * 1024;

/// Read a single length-prefixed JSON message from `reader`.
///
/// Wire format:
///   - 4-byte big-endian length (u32)
///   - that many bytes of UTF-8 JSON
pub fn read_message<R, T>(reader: &mut R) -> Result<T>
where
    R: Read,
    T: DeserializeOwned,
{
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf)?;
    let len = u32::from_be_bytes(len_buf) as usize;

    anyhow::ensure!(len <= MAX_FRAME_LEN, "frame of {len} bytes exceeds limit");

    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;

    let msg = serde_json::from_slice(&buf).context("malformed message payload")?;
    Ok(msg)
}

/// Write a single length-prefixed JSON message to `writer`.
pub fn write_message<W, T>(writer: &mut W, msg: &T) -> Result<()>
where
    W: Write,
    T: Serialize,
{
    let bytes = serde_json::to_vec(msg)?;
    let len: u32 = bytes
        .len()
        .try_into()
        .context("message too large to fit into u32 length prefix")?;

    writer.write_all(&len.to_be_bytes())?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Whether `err` came from the peer closing the stream between frames.
pub fn is_disconnect(err: &anyhow::Error) -> bool {
    err.downcast_ref::<std::io::Error>()
        .is_some_and(|e| e.kind() == std::io::ErrorKind::UnexpectedEof)
}
