//! # IPC Server
//!
//! Unix socket server exposing the persona service to local clients.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release with load, chat, list and status requests

use anyhow::Result;
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::features::personas::PersonaService;
use crate::ipc::protocol::{read_message, write_message, ServiceRequest, ServiceResponse};

/// Maximum number of connected clients
const MAX_CLIENTS: usize = 32;

/// IPC server handle for the persona service
pub struct IpcServer {
    service: Arc<PersonaService>,
    socket_path: PathBuf,
    /// Connected client count
    client_count: Arc<RwLock<usize>>,
}

impl IpcServer {
    /// Create a new IPC server (does not start listening yet)
    pub fn new(service: Arc<PersonaService>, socket_path: impl Into<PathBuf>) -> Self {
        IpcServer {
            service,
            socket_path: socket_path.into(),
            client_count: Arc::new(RwLock::new(0)),
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Bind the socket and run the accept loop in a background task
    pub async fn start(self: Arc<Self>) -> Result<JoinHandle<()>> {
        // Remove existing socket file if it exists
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path)?;
        }

        let listener = UnixListener::bind(&self.socket_path)?;
        info!("IPC server listening on {}", self.socket_path.display());

        let server = self.clone();
        let handle = tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((stream, _addr)) => {
                        let client_count = *server.client_count.read().await;
                        if client_count >= MAX_CLIENTS {
                            warn!("Maximum IPC clients reached ({}), rejecting connection", MAX_CLIENTS);
                            continue;
                        }

                        *server.client_count.write().await += 1;
                        info!("Client connected (total: {})", client_count + 1);

                        let server_clone = server.clone();
                        let client_count_ref = server.client_count.clone();
                        tokio::spawn(async move {
                            if let Err(e) = server_clone.handle_client(stream).await {
                                debug!("Client handler ended: {}", e);
                            }
                            *client_count_ref.write().await -= 1;
                            info!("Client disconnected");
                        });
                    }
                    Err(e) => {
                        error!("Failed to accept IPC connection: {}", e);
                    }
                }
            }
        });

        Ok(handle)
    }

    /// Serve requests from one client, answering each in order
    async fn handle_client(self: Arc<Self>, stream: UnixStream) -> Result<()> {
        let (mut reader, mut writer) = stream.into_split();

        while let Some(request) = read_message::<ServiceRequest, _>(&mut reader).await? {
            debug!("Processing request: {:?}", request);
            let response = self.dispatch(request).await;
            write_message(&mut writer, &response).await?;
        }

        Ok(())
    }

    /// Run one request against the service and build its response
    pub async fn dispatch(&self, request: ServiceRequest) -> ServiceResponse {
        let request_id = request.request_id().to_string();

        let result = match request {
            ServiceRequest::LoadPersona { request_id, name } => self
                .service
                .load_persona(&name)
                .await
                .map(|message| ServiceResponse::Loaded {
                    request_id,
                    message,
                }),
            ServiceRequest::Chat {
                request_id,
                message,
            } => self
                .service
                .chat(&message)
                .await
                .map(|response| ServiceResponse::Reply {
                    request_id,
                    response,
                }),
            ServiceRequest::ListPersonas { request_id } => self
                .service
                .list_personas()
                .await
                .map(|personas| ServiceResponse::Personas {
                    request_id,
                    personas,
                }),
            ServiceRequest::Status { request_id } => {
                let (persona, turns) = self.service.status().await;
                Ok(ServiceResponse::Status {
                    request_id,
                    persona,
                    turns,
                })
            }
        };

        result.unwrap_or_else(|e| {
            warn!("Request {request_id} failed: {e}");
            ServiceResponse::from_error(request_id, &e)
        })
    }

    /// Get connected client count
    pub async fn client_count(&self) -> usize {
        *self.client_count.read().await
    }

    /// Remove the socket file (call on shutdown)
    pub fn cleanup(&self) {
        if let Err(e) = std::fs::remove_file(&self.socket_path) {
            debug!("Could not remove socket {}: {}", self.socket_path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;
    use crate::features::completion::mock::MockCompletionClient;
    use crate::features::personas::{JsonFileStore, ProfileBuilder};
    use crate::ipc::client::IpcClient;

    async fn server_in(dir: &Path, reply: &str) -> Arc<IpcServer> {
        let store = Arc::new(JsonFileStore::new(dir.join("profiles")));
        let builder = ProfileBuilder::new(
            Arc::new(MockCompletionClient::scripted(&["casual, tech-focused", "rust\ncoffee"])),
            store.clone(),
        );
        builder
            .build_and_save("alice", &["Coffee first, code second.".to_string()])
            .await
            .unwrap();

        let service = Arc::new(PersonaService::new(
            Arc::new(MockCompletionClient::replying(reply)),
            store,
        ));
        Arc::new(IpcServer::new(service, dir.join("persona.sock")))
    }

    #[tokio::test]
    async fn test_dispatch_maps_errors() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_in(dir.path(), "hi").await;

        let response = server
            .dispatch(ServiceRequest::Chat {
                request_id: "1".to_string(),
                message: "hello".to_string(),
            })
            .await;
        assert!(matches!(
            response,
            ServiceResponse::Error { kind: ErrorKind::InvalidState, .. }
        ));

        let response = server
            .dispatch(ServiceRequest::LoadPersona {
                request_id: "2".to_string(),
                name: "ghost".to_string(),
            })
            .await;
        assert!(matches!(
            response,
            ServiceResponse::Error { kind: ErrorKind::NotFound, .. }
        ));
        assert_eq!(response.request_id(), "2");

        let response = server
            .dispatch(ServiceRequest::Status {
                request_id: "3".to_string(),
            })
            .await;
        assert_eq!(
            response,
            ServiceResponse::Status {
                request_id: "3".to_string(),
                persona: None,
                turns: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_socket_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_in(dir.path(), "Spaces, always.").await;
        let handle = server.clone().start().await.unwrap();

        let mut client = IpcClient::connect(server.socket_path()).await.unwrap();
        assert_eq!(client.list_personas().await.unwrap(), vec!["alice"]);
        assert_eq!(
            client.load_persona("alice").await.unwrap(),
            "Loaded persona for alice"
        );
        assert_eq!(
            client
                .chat("What do you think about tabs vs spaces?")
                .await
                .unwrap(),
            "Spaces, always."
        );

        let (persona, turns) = client.status().await.unwrap();
        assert_eq!(persona.as_deref(), Some("alice"));
        assert_eq!(turns, 2);

        handle.abort();
        server.cleanup();
        assert!(!server.socket_path().exists());
    }
}
