//! Model delegate: the conversion capability and its chat-completions implementation.

mod error;

use std::future::Future;
use std::time::Duration;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use serde::Deserialize;
use serde_json::json;

use crate::core::config::Config;

pub use error::{ChatError, map_api_error};

/// Fixed instruction sent with every chunk.
pub const INSTRUCTION: &str = "You are a text processor. Your ONLY TASK is to replace ALL inline \
LaTeX equations formatted as \\( ... \\) with Markdown-style equations $ ... $. \
Do NOT change any other text. Return ONLY the modified text.";

/// Something that can rewrite a piece of text following an instruction.
///
/// Compliance is not guaranteed: callers must treat the reply as a suggestion
/// and run the regex rewriter over it.
pub trait EquationModel {
    fn convert(
        &self,
        prompt: &str,
        text: &str,
    ) -> impl Future<Output = Result<String, ChatError>>;
}

/// Hosted model reached through an OpenAI-compatible chat completions API.
#[derive(Debug, Clone)]
pub struct ChatModel {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl ChatModel {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::with_config(config.openai_config.clone()),
            model: config.model_id.clone(),
            timeout: config.timeout,
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Deserialize)]
struct CompletionBody {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

impl CompletionBody {
    fn into_content(self) -> Option<String> {
        self.choices.into_iter().next()?.message.content
    }
}

impl EquationModel for ChatModel {
    async fn convert(&self, prompt: &str, text: &str) -> Result<String, ChatError> {
        log::debug!(
            "Calling {} with {} chars",
            self.model,
            text.chars().count()
        );
        let request = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": prompt },
                { "role": "user", "content": text },
            ],
        });

        let chat_api = self.client.chat();
        let call = chat_api.create_byot::<_, CompletionBody>(request);
        let body = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| ChatError::Timeout(self.timeout))?
            .map_err(map_api_error)?;

        match body.into_content() {
            Some(content) if !content.trim().is_empty() => Ok(content),
            _ => Err(ChatError::EmptyResponse),
        }
    }
}
