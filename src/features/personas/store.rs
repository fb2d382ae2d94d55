//! # Persona Store
//!
//! Flat-file JSON storage for persona records, one file per persona at
//! `<root>/<name>_persona.json`. No locking; the last writer wins.

use async_trait::async_trait;
use log::{debug, info, warn};
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use super::model::Persona;
use crate::core::{PersonaError, Result};

/// Filename suffix that marks a persona record
pub const PERSONA_FILE_SUFFIX: &str = "_persona.json";

/// Read/write persona records keyed by name.
#[async_trait]
pub trait PersonaStore: Send + Sync {
    /// Refuse names this store cannot hold, before any work is done for them.
    fn validate_name(&self, name: &str) -> Result<()>;

    /// Write the record, replacing any existing one. Returns the written path.
    async fn save(&self, persona: &Persona) -> Result<PathBuf>;

    /// Read the record stored under `name`.
    async fn load(&self, name: &str) -> Result<Persona>;

    /// Names of all stored personas, sorted. Empty when nothing has been stored yet.
    async fn list(&self) -> Result<Vec<String>>;
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deterministic file path for a persona name.
    ///
    /// Names are used verbatim as part of the filename, so anything that could
    /// escape the storage directory is refused.
    pub fn persona_path(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(PersonaError::Storage(format!(
                "invalid persona name: {name:?}"
            )));
        }
        Ok(self.root.join(format!("{name}{PERSONA_FILE_SUFFIX}")))
    }
}

#[async_trait]
impl PersonaStore for JsonFileStore {
    fn validate_name(&self, name: &str) -> Result<()> {
        self.persona_path(name).map(|_| ())
    }

    async fn save(&self, persona: &Persona) -> Result<PathBuf> {
        let path = self.persona_path(&persona.name)?;
        tokio::fs::create_dir_all(&self.root).await?;

        let json = serde_json::to_string_pretty(persona)?;
        tokio::fs::write(&path, json).await?;

        info!("Persona saved to {}", path.display());
        Ok(path)
    }

    async fn load(&self, name: &str) -> Result<Persona> {
        let path = self.persona_path(name)?;

        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == IoErrorKind::NotFound => {
                debug!("No persona file at {}", path.display());
                return Err(PersonaError::NotFound {
                    name: name.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let persona: Persona = serde_json::from_str(&contents).map_err(|e| {
            PersonaError::Storage(format!("malformed persona record {}: {e}", path.display()))
        })?;
        persona.validate()?;

        if persona.name != name {
            warn!(
                "Persona file {} holds a record named {:?}",
                path.display(),
                persona.name
            );
        }

        Ok(persona)
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if let Some(name) = file_name.strip_suffix(PERSONA_FILE_SUFFIX) {
                if !name.is_empty() {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::personas::model::{Sample, WritingStyle};
    use chrono::Utc;

    fn persona(name: &str) -> Persona {
        let now = Utc::now();
        Persona::new(
            name,
            vec![
                Sample::new("I love rust and systems design.", now),
                Sample::new("Coffee first, code second.", now),
            ],
            WritingStyle {
                style_analysis: "casual, tech-focused".to_string(),
                sample_tweets: vec![
                    "I love rust and systems design.".to_string(),
                    "Coffee first, code second.".to_string(),
                ],
            },
            vec!["rust".to_string(), "coffee".to_string()],
            now,
        )
    }

    #[test]
    fn test_persona_path_is_deterministic() {
        let store = JsonFileStore::new("profiles");
        assert_eq!(
            store.persona_path("alice").unwrap(),
            PathBuf::from("profiles/alice_persona.json")
        );
    }

    #[test]
    fn test_persona_path_rejects_traversal() {
        let store = JsonFileStore::new("profiles");
        assert!(store.persona_path("../etc").is_err());
        assert!(store.persona_path("").is_err());
        assert!(store.persona_path("..").is_err());
        assert!(store.validate_name("a\\b").is_err());
        assert!(store.validate_name("alice").is_ok());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("profiles"));
        let original = persona("alice");

        let path = store.save(&original).await.unwrap();
        assert!(path.ends_with("alice_persona.json"));

        let loaded = store.load("alice").await.unwrap();
        assert_eq!(loaded, original);
    }

    #[tokio::test]
    async fn test_save_creates_directory_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("profiles");
        let store = JsonFileStore::new(&root);

        store.save(&persona("alice")).await.unwrap();
        assert!(root.is_dir());

        let mut rebuilt = persona("alice");
        rebuilt.topics = vec!["tabs".to_string()];
        store.save(&rebuilt).await.unwrap();

        let loaded = store.load("alice").await.unwrap();
        assert_eq!(loaded.topics, vec!["tabs"]);
    }

    #[tokio::test]
    async fn test_load_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        let err = store.load("nobody").await.unwrap_err();
        assert!(matches!(err, PersonaError::NotFound { ref name } if name == "nobody"));
    }

    #[tokio::test]
    async fn test_load_malformed_is_storage_failure() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        tokio::fs::write(dir.path().join("broken_persona.json"), r#"{"name":"broken"}"#)
            .await
            .unwrap();

        let err = store.load("broken").await.unwrap_err();
        assert!(matches!(err, PersonaError::Storage(_)));
    }

    #[tokio::test]
    async fn test_load_record_with_naive_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        let json = r#"{
            "name": "alice",
            "tweets": [{"text": "Coffee first, code second.", "timestamp": "2024-05-01T12:00:00.123456"}],
            "writing_style": {"style_analysis": "casual", "sample_tweets": ["Coffee first, code second."]},
            "topics": ["coffee"],
            "interaction_guidelines": {"tone": "casual", "knowledge_base": ["coffee"]},
            "created_at": "2024-05-01T12:00:01.5"
        }"#;
        tokio::fs::write(dir.path().join("alice_persona.json"), json)
            .await
            .unwrap();

        let loaded = store.load("alice").await.unwrap();
        assert_eq!(
            loaded.tweets[0].timestamp.to_rfc3339(),
            "2024-05-01T12:00:00.123456+00:00"
        );
        assert_eq!(loaded.created_at.to_rfc3339(), "2024-05-01T12:00:01.500+00:00");

        // saving writes the timestamps back with an offset
        store.save(&loaded).await.unwrap();
        let raw = tokio::fs::read_to_string(dir.path().join("alice_persona.json"))
            .await
            .unwrap();
        assert!(raw.contains("2024-05-01T12:00:00.123456Z"));
    }

    #[tokio::test]
    async fn test_list_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("does-not-exist"));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_only_matches_persona_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        store.save(&persona("bob")).await.unwrap();
        store.save(&persona("alice")).await.unwrap();
        tokio::fs::write(dir.path().join("notes.txt"), "x").await.unwrap();
        tokio::fs::write(dir.path().join("carol.json"), "{}").await.unwrap();

        assert_eq!(store.list().await.unwrap(), vec!["alice", "bob"]);
    }
}
