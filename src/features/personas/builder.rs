//! # Feature: Profile Builder
//!
//! Turns a list of text samples into a stored persona. The completion
//! service is asked twice: once for a writing style analysis over the first
//! samples, once for the topics across all of them.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release

use chrono::Utc;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::model::{Persona, Sample, WritingStyle};
use super::prompt_builder::{style_analysis_request, topic_extraction_request};
use super::store::PersonaStore;
use crate::core::Result;
use crate::features::completion::CompletionClient;

/// How many samples are sent for style analysis and kept as evidence
pub const STYLE_SAMPLE_LIMIT: usize = 10;

pub struct ProfileBuilder {
    completion: Arc<dyn CompletionClient>,
    store: Arc<dyn PersonaStore>,
}

impl ProfileBuilder {
    pub fn new(completion: Arc<dyn CompletionClient>, store: Arc<dyn PersonaStore>) -> Self {
        Self { completion, store }
    }

    /// Build a persona from samples and persist it. Returns the record and where it was written.
    ///
    /// The name is checked against the store first, so an unusable name never
    /// reaches the completion service. Completion failures propagate before
    /// anything is written.
    pub async fn build_and_save(&self, name: &str, samples: &[String]) -> Result<(Persona, PathBuf)> {
        self.store.validate_name(name)?;
        let persona = self.build(name, samples).await?;
        let path = self.store.save(&persona).await?;
        Ok((persona, path))
    }

    /// Build a persona without persisting it.
    pub async fn build(&self, name: &str, samples: &[String]) -> Result<Persona> {
        info!("Building persona {name} from {} samples", samples.len());

        let tweets: Vec<Sample> = samples
            .iter()
            .map(|text| Sample::new(text.clone(), Utc::now()))
            .collect();
        let created_at = Utc::now();

        let writing_style = self.analyze_writing_style(samples).await?;
        let topics = self.extract_topics(samples).await?;

        Ok(Persona::new(name, tweets, writing_style, topics, created_at))
    }

    pub async fn analyze_writing_style(&self, samples: &[String]) -> Result<WritingStyle> {
        let evidence = &samples[..samples.len().min(STYLE_SAMPLE_LIMIT)];
        let style_analysis = self
            .completion
            .complete(style_analysis_request(evidence))
            .await?;
        debug!("Style analysis returned {} chars", style_analysis.len());

        Ok(WritingStyle {
            style_analysis,
            sample_tweets: evidence.to_vec(),
        })
    }

    pub async fn extract_topics(&self, samples: &[String]) -> Result<Vec<String>> {
        let response = self
            .completion
            .complete(topic_extraction_request(samples))
            .await?;
        let topics = parse_topics(&response);
        debug!("Extracted {} topics", topics.len());
        Ok(topics)
    }
}

/// Parse a topic list reply: one topic per line, list markers and
/// surrounding whitespace stripped, empty lines dropped.
///
/// A reply with no usable lines yields an empty list.
pub fn parse_topics(response: &str) -> Vec<String> {
    response
        .lines()
        .map(|line| line.trim_matches(|c: char| c == '-' || c.is_whitespace()))
        .filter(|topic| !topic.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split newline-delimited sample text into samples, skipping blank lines.
pub fn parse_samples(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read samples from a file with one sample per line.
pub async fn load_samples_from_file(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let contents = tokio::fs::read_to_string(path.as_ref()).await?;
    Ok(parse_samples(&contents))
}
