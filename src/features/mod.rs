//! Feature modules: the completion service boundary and the persona lifecycle.

pub mod completion;
pub mod personas;

pub use completion::{ChatMessage, CompletionClient, OpenAiCompletionClient, Role};
pub use personas::{JsonFileStore, Persona, PersonaService, PersonaStore, ProfileBuilder};
