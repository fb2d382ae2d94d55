//! Prompt construction for persona analysis and role-play
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Style/topic analysis prompts and persona chat prompt builder

use super::model::{Persona, Turn};
use crate::features::completion::ChatMessage;

/// System instruction for the writing style analysis request
pub const STYLE_ANALYSIS_INSTRUCTION: &str = "Analyze the writing style, tone, and patterns in these tweets. Focus on:
1. Tone (formal, casual, humorous, etc.)
2. Common phrases or expressions
3. Writing patterns (sentence structure, punctuation usage)
4. Unique stylistic elements";

/// System instruction for the topic extraction request
pub const TOPIC_EXTRACTION_INSTRUCTION: &str = "Extract the main topics, interests, and areas of expertise from these tweets. \
Return them as a list of specific topics.";

const STYLE_ANALYSIS_PREFIX: &str =
    "Analyze these tweets and describe the writing style, common phrases, and tone:";

const PERSONA_GUIDELINES: &str = "Important guidelines:
1. Respond in your characteristic style while maintaining consistency with your known interests and tone
2. Use your writing patterns and common phrases naturally
3. Stay true to the topics and expertise shown in your tweets
4. If asked about something outside your knowledge base, acknowledge it honestly
5. Maintain the same personality throughout the conversation";

/// Messages for the style analysis request over the given sample subset.
///
/// The samples follow the prefix line as a bracketed, quoted list
/// (`["a", "b"]`, Debug formatting). The model reads this as a plain list
/// and the exact quoting is not part of any stored format.
pub fn style_analysis_request(samples: &[String]) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(STYLE_ANALYSIS_INSTRUCTION),
        ChatMessage::user(format!("{STYLE_ANALYSIS_PREFIX}\n{samples:?}")),
    ]
}

/// Messages for the topic extraction request; samples are sent newline-joined.
pub fn topic_extraction_request(samples: &[String]) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(TOPIC_EXTRACTION_INSTRUCTION),
        ChatMessage::user(samples.join("\n")),
    ]
}

/// Render the role-play system instruction for a persona.
pub fn persona_system_prompt(persona: &Persona) -> String {
    format!(
        "You are {}.\nYour writing style is: {}\nYou typically talk about: {}\n\n{}",
        persona.name,
        persona.writing_style.style_analysis,
        persona.topics.join(", "),
        PERSONA_GUIDELINES
    )
}

/// Builder for the message list sent on each chat exchange
///
/// # Example
///
/// ```ignore
/// let messages = PromptBuilder::new(&persona)
///     .with_history(&window)
///     .build();
/// ```
pub struct PromptBuilder<'a> {
    persona: &'a Persona,
    history: &'a [Turn],
}

impl<'a> PromptBuilder<'a> {
    pub fn new(persona: &'a Persona) -> Self {
        Self {
            persona,
            history: &[],
        }
    }

    /// Set the conversation turns that follow the system instruction, oldest first
    pub fn with_history(mut self, history: &'a [Turn]) -> Self {
        self.history = history;
        self
    }

    /// Build the final message list: one system message, then the history
    pub fn build(self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.history.len() + 1);
        messages.push(ChatMessage::system(persona_system_prompt(self.persona)));
        messages.extend(self.history.iter().map(ChatMessage::from));
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::completion::Role;
    use crate::features::personas::model::WritingStyle;
    use chrono::Utc;

    fn persona() -> Persona {
        Persona::new(
            "alice",
            vec![],
            WritingStyle {
                style_analysis: "casual, tech-focused".to_string(),
                sample_tweets: vec![],
            },
            vec!["rust".to_string(), "systems design".to_string(), "coffee".to_string()],
            Utc::now(),
        )
    }

    #[test]
    fn test_system_prompt_template() {
        let expected = "You are alice.
Your writing style is: casual, tech-focused
You typically talk about: rust, systems design, coffee

Important guidelines:
1. Respond in your characteristic style while maintaining consistency with your known interests and tone
2. Use your writing patterns and common phrases naturally
3. Stay true to the topics and expertise shown in your tweets
4. If asked about something outside your knowledge base, acknowledge it honestly
5. Maintain the same personality throughout the conversation";
        assert_eq!(persona_system_prompt(&persona()), expected);
    }

    #[test]
    fn test_style_request_lists_samples() {
        let samples = vec!["one".to_string(), "two".to_string()];
        let messages = style_analysis_request(&samples);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, STYLE_ANALYSIS_INSTRUCTION);
        assert_eq!(
            messages[1].content,
            "Analyze these tweets and describe the writing style, common phrases, and tone:\n[\"one\", \"two\"]"
        );
    }

    #[test]
    fn test_topic_request_joins_with_newlines() {
        let samples = vec!["one".to_string(), "two".to_string()];
        let messages = topic_extraction_request(&samples);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].content, "one\ntwo");
    }

    #[test]
    fn test_builder_puts_system_first() {
        let p = persona();
        let history = vec![Turn::user("hi"), Turn::assistant("hello"), Turn::user("sup")];
        let messages = PromptBuilder::new(&p).with_history(&history).build();

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1], ChatMessage::user("hi"));
        assert_eq!(messages[2], ChatMessage::assistant("hello"));
        assert_eq!(messages[3], ChatMessage::user("sup"));
    }

    #[test]
    fn test_builder_without_history() {
        let p = persona();
        let messages = PromptBuilder::new(&p).build();
        assert_eq!(messages.len(), 1);
    }
}
