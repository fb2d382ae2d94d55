//! # Personas Feature
//!
//! Persona profiles derived from text samples: building them, storing them,
//! and role-playing a loaded one.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release

pub mod builder;
pub mod model;
pub mod prompt_builder;
pub mod service;
pub mod session;
pub mod store;

pub use builder::{load_samples_from_file, parse_topics, ProfileBuilder, STYLE_SAMPLE_LIMIT};
pub use model::{InteractionGuidelines, Persona, Sample, Turn, TurnRole, WritingStyle};
pub use prompt_builder::{persona_system_prompt, PromptBuilder};
pub use service::{PersonaService, HISTORY_WINDOW};
pub use session::SessionContext;
pub use store::{JsonFileStore, PersonaStore, PERSONA_FILE_SUFFIX};
