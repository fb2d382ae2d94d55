//! # IPC Protocol
//!
//! Request/response types for the persona service over a Unix socket.
//!
//! Uses length-prefixed JSON framing:
//! - 4 bytes: message length (big-endian u32)
//! - N bytes: JSON payload
//!
//! Every request carries a `request_id` that is echoed on its response.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::core::{ErrorKind, PersonaError};

/// Largest accepted frame payload
pub const MAX_FRAME_LEN: usize = 10 * 1024 * 1024;

// ============================================================================
// Client -> Service Requests
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServiceRequest {
    /// Make a stored persona the active one
    LoadPersona { request_id: String, name: String },
    /// Send a message to the active persona
    Chat { request_id: String, message: String },
    /// List stored persona names
    ListPersonas { request_id: String },
    /// Report the active persona and history length
    Status { request_id: String },
}

impl ServiceRequest {
    pub fn request_id(&self) -> &str {
        match self {
            ServiceRequest::LoadPersona { request_id, .. }
            | ServiceRequest::Chat { request_id, .. }
            | ServiceRequest::ListPersonas { request_id }
            | ServiceRequest::Status { request_id } => request_id,
        }
    }
}

// ============================================================================
// Service -> Client Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServiceResponse {
    Loaded {
        request_id: String,
        message: String,
    },
    Reply {
        request_id: String,
        response: String,
    },
    Personas {
        request_id: String,
        personas: Vec<String>,
    },
    Status {
        request_id: String,
        persona: Option<String>,
        turns: usize,
    },
    Error {
        request_id: String,
        kind: ErrorKind,
        message: String,
    },
}

impl ServiceResponse {
    pub fn from_error(request_id: impl Into<String>, err: &PersonaError) -> Self {
        // NotFound reports the bare name so clients can rebuild the typed error
        let message = match err {
            PersonaError::NotFound { name } => name.clone(),
            PersonaError::InvalidState(msg)
            | PersonaError::Upstream(msg)
            | PersonaError::Storage(msg) => msg.clone(),
            other => other.to_string(),
        };
        ServiceResponse::Error {
            request_id: request_id.into(),
            kind: err.kind(),
            message,
        }
    }

    pub fn request_id(&self) -> &str {
        match self {
            ServiceResponse::Loaded { request_id, .. }
            | ServiceResponse::Reply { request_id, .. }
            | ServiceResponse::Personas { request_id, .. }
            | ServiceResponse::Status { request_id, .. }
            | ServiceResponse::Error { request_id, .. } => request_id,
        }
    }
}

// ============================================================================
// Framing - Length-prefixed JSON messages
// ============================================================================

/// Encode a message with length prefix
pub fn encode_message<T: Serialize>(msg: &T) -> Result<Vec<u8>> {
    let json = serde_json::to_vec(msg)?;
    if json.len() > MAX_FRAME_LEN {
        return Err(anyhow!("Message too large: {} bytes", json.len()));
    }
    let len = json.len() as u32;
    let mut buf = Vec::with_capacity(4 + json.len());
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(&json);
    Ok(buf)
}

/// Read one framed message. Returns `None` on a clean end of stream, that is
/// when the stream ends before any byte of the next length prefix.
pub async fn read_message<T, R>(reader: &mut R) -> Result<Option<T>>
where
    T: for<'de> Deserialize<'de>,
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    let mut filled = 0;
    while filled < len_buf.len() {
        let n = reader.read(&mut len_buf[filled..]).await?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(anyhow!("Stream ended inside a length prefix ({} of 4 bytes)", filled));
        }
        filled += n;
    }
    let len = u32::from_be_bytes(len_buf) as usize;

    if len > MAX_FRAME_LEN {
        return Err(anyhow!("Message too large: {} bytes", len));
    }

    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).await?;

    Ok(Some(serde_json::from_slice(&buf)?))
}

/// Write a framed message to a writer
pub async fn write_message<T, W>(writer: &mut W, msg: &T) -> Result<()>
where
    T: Serialize,
    W: AsyncWrite + Unpin,
{
    let encoded = encode_message(msg)?;
    writer.write_all(&encoded).await?;
    writer.flush().await?;
    Ok(())
}
