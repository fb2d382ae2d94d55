// Core layer - shared types, configuration and errors
pub mod core;

// Features layer - completion client and persona lifecycle
pub mod features;

// IPC layer - communication between the persona service and its clients
pub mod ipc;

pub use crate::core::{Config, ErrorKind, PersonaError, Result};

pub use crate::features::{
    // Completion
    ChatMessage, CompletionClient, OpenAiCompletionClient, Role,
    // Personas
    JsonFileStore, Persona, PersonaService, PersonaStore, ProfileBuilder,
};

pub use crate::ipc::{IpcClient, IpcServer, ServiceRequest, ServiceResponse};
