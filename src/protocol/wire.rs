//! Message framing for the gateway socket.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;

use crate::error::{DaemonError, ProtocolErrorKind};

/// Maximum frame size (1 MB by default, can be overridden).
#[allow(dead_code)]
pub const DEFAULT_MAX_FRAME_SIZE: usize = 1_048_576;

/// Read a length-prefixed frame from the reader.
///
/// Returns the raw bytes of the frame payload.
/// Returns an error if the frame is too large or if reading fails.
pub async fn read_frame<R>(reader: &mut R, max_size: usize) -> Result<Vec<u8>, DaemonError>
where
    R: AsyncReadExt + Unpin,
{
    // Read the 4-byte length prefix
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(DaemonError::Protocol {
                kind: ProtocolErrorKind::ConnectionClosed,
            });
        }
        Err(e) => return Err(DaemonError::Io(e)),
    }

    let len = u32::from_be_bytes(len_buf) as usize;

    // Sanity check frame size
    if len > max_size {
        return Err(DaemonError::Protocol {
            kind: ProtocolErrorKind::MessageTooLarge {
                size: len,
                max: max_size,
            },
        });
    }

    // Read the frame payload
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).await?;

    Ok(buf)
}

/// Write a length-prefixed frame to the writer.
pub async fn write_frame<W>(writer: &mut W, data: &[u8]) -> Result<(), DaemonError>
where
    W: AsyncWriteExt + Unpin,
{
    let len = (data.len() as u32).to_be_bytes();
    writer.write_all(&len).await?;
    writer.write_all(data).await?;
    writer.flush().await?;
    Ok(())
}

/// Read a length-prefixed frame with a timeout.
///
/// Returns a ConnectionTimeout error if the read takes longer than the specified duration.
pub async fn read_frame_with_timeout<R>(
    reader: &mut R,
    max_size: usize,
    timeout_duration: Duration,
) -> Result<Vec<u8>, DaemonError>
where
    R: AsyncReadExt + Unpin,
{
    timeout(timeout_duration, read_frame(reader, max_size))
        .await
        .map_err(|_| DaemonError::Protocol {
            kind: ProtocolErrorKind::ConnectionTimeout,
        })?
}

/// Write a length-prefixed frame with a timeout.
///
/// Returns a ConnectionTimeout error if the write takes longer than the specified duration.
pub async fn write_frame_with_timeout<W>(
    writer: &mut W,
    data: &[u8],
    timeout_duration: Duration,
) -> Result<(), DaemonError>
where
    W: AsyncWriteExt + Unpin,
{
    timeout(timeout_duration, write_frame(writer, data))
        .await
        .map_err(|_| DaemonError::Protocol {
            kind: ProtocolErrorKind::ConnectionTimeout,
        })?
}
