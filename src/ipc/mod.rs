//! # IPC Module
//!
//! Inter-process communication between the persona service and its clients.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial IPC implementation with Unix socket protocol

pub mod client;
pub mod protocol;
pub mod server;

pub use client::{connect_with_retry, IpcClient};
pub use protocol::{ServiceRequest, ServiceResponse};
pub use server::IpcServer;
