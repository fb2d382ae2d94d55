//! # IPC Client
//!
//! Unix socket client for talking to a running persona service.

use crate::core::PersonaError;
use crate::ipc::protocol::{read_message, write_message, ServiceRequest, ServiceResponse};
use anyhow::{anyhow, Result};
use log::{info, warn};
use std::path::Path;
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::UnixStream;
use tokio::time::{timeout, Duration};

/// Connection timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// IPC client for the persona service
///
/// Requests are answered in order on one connection, so each call waits for
/// its response before returning. Chat calls wait as long as the completion
/// service takes.
pub struct IpcClient {
    reader: OwnedReadHalf,
    writer: OwnedWriteHalf,
}

fn new_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl IpcClient {
    /// Connect to the service socket
    pub async fn connect(socket_path: impl AsRef<Path>) -> Result<Self> {
        let socket_path = socket_path.as_ref();
        info!("Connecting to persona service at {}", socket_path.display());

        let stream = timeout(CONNECT_TIMEOUT, UnixStream::connect(socket_path))
            .await
            .map_err(|_| anyhow!("Connection timeout"))?
            .map_err(|e| anyhow!("Failed to connect: {}", e))?;

        let (reader, writer) = stream.into_split();
        Ok(IpcClient { reader, writer })
    }

    /// Send a request and wait for its response
    pub async fn request(&mut self, request: ServiceRequest) -> Result<ServiceResponse> {
        write_message(&mut self.writer, &request).await?;

        let response: ServiceResponse = read_message(&mut self.reader)
            .await?
            .ok_or_else(|| anyhow!("Connection closed by persona service"))?;

        if response.request_id() != request.request_id() {
            return Err(anyhow!(
                "Response for {} does not match request {}",
                response.request_id(),
                request.request_id()
            ));
        }
        Ok(response)
    }

    /// Load a persona, returning the service's acknowledgement
    pub async fn load_persona(&mut self, name: &str) -> Result<String> {
        let response = self
            .request(ServiceRequest::LoadPersona {
                request_id: new_request_id(),
                name: name.to_string(),
            })
            .await?;

        match response {
            ServiceResponse::Loaded { message, .. } => Ok(message),
            other => Err(unexpected(other)),
        }
    }

    /// Chat with the loaded persona
    pub async fn chat(&mut self, message: &str) -> Result<String> {
        let response = self
            .request(ServiceRequest::Chat {
                request_id: new_request_id(),
                message: message.to_string(),
            })
            .await?;

        match response {
            ServiceResponse::Reply { response, .. } => Ok(response),
            other => Err(unexpected(other)),
        }
    }

    /// List stored personas
    pub async fn list_personas(&mut self) -> Result<Vec<String>> {
        let response = self
            .request(ServiceRequest::ListPersonas {
                request_id: new_request_id(),
            })
            .await?;

        match response {
            ServiceResponse::Personas { personas, .. } => Ok(personas),
            other => Err(unexpected(other)),
        }
    }

    /// Active persona name and number of stored turns
    pub async fn status(&mut self) -> Result<(Option<String>, usize)> {
        let response = self
            .request(ServiceRequest::Status {
                request_id: new_request_id(),
            })
            .await?;

        match response {
            ServiceResponse::Status { persona, turns, .. } => Ok((persona, turns)),
            other => Err(unexpected(other)),
        }
    }
}

/// Turn an error response back into a typed error; anything else is a protocol fault.
fn unexpected(response: ServiceResponse) -> anyhow::Error {
    match response {
        ServiceResponse::Error { kind, message, .. } => {
            let err: PersonaError = kind.into_error(message);
            err.into()
        }
        other => anyhow!("Unexpected response from persona service: {:?}", other),
    }
}

/// Try to connect with retries
pub async fn connect_with_retry(
    socket_path: impl AsRef<Path>,
    max_attempts: u32,
    delay: Duration,
) -> Result<IpcClient> {
    let socket_path = socket_path.as_ref();
    let mut attempt = 1;
    loop {
        match IpcClient::connect(socket_path).await {
            Ok(client) => return Ok(client),
            Err(e) if attempt < max_attempts => {
                warn!(
                    "Connection attempt {} failed: {}. Retrying in {:?}...",
                    attempt, e, delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                return Err(anyhow!(
                    "Failed to connect after {} attempts: {}",
                    max_attempts,
                    e
                ))
            }
        }
    }
}
