use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::AiError;
use crate::metrics::record_ai_generation;

/// Connection settings of an OpenAI compatible chat-completions endpoint.
#[derive(Clone, Debug)]
pub struct AiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

/// What a completion is for. Selects the system message and labels metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationKind {
    Mcq,
    DailyQuestion,
    Motivation,
    Buddy,
    StudyPlan,
}

impl GenerationKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mcq => "mcq",
            Self::DailyQuestion => "daily_question",
            Self::Motivation => "motivation",
            Self::Buddy => "buddy",
            Self::StudyPlan => "study_plan",
        }
    }

    fn system_message(&self) -> &'static str {
        match self {
            Self::Mcq | Self::DailyQuestion => {
                "You are an expert NEET-UG question creator. Always respond with valid JSON only."
            }
            Self::Motivation => "You are a motivational NEET mentor.",
            Self::Buddy => {
                "You are a friendly NEET tutor helping students prepare for medical entrance exams."
            }
            Self::StudyPlan => "You are an expert NEET study planner. Respond with valid JSON only.",
        }
    }

    fn temperature(&self) -> f32 {
        match self {
            Self::Mcq | Self::DailyQuestion | Self::StudyPlan => 0.4,
            Self::Motivation | Self::Buddy => 0.7,
        }
    }
}

/// Chat-completions client. Cheap to clone.
#[derive(Clone)]
pub struct AiClient {
    client: Client,
    config: Option<AiConfig>,
}

impl AiClient {
    pub fn new(config: Option<AiConfig>) -> Result<Self, AiError> {
        let timeout = config
            .as_ref()
            .map_or(60, |config| config.timeout_secs);
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(Self { client, config })
    }

    /// Client that fails every completion with [`AiError::Disabled`].
    pub fn disabled() -> Self {
        Self {
            client: Client::new(),
            config: None,
        }
    }

    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Run one completion and return the trimmed assistant message.
    pub async fn complete(&self, kind: GenerationKind, prompt: &str) -> Result<String, AiError> {
        let result = self.request(kind, prompt).await;
        record_ai_generation(kind.as_str(), result.is_ok());
        result
    }

    async fn request(&self, kind: GenerationKind, prompt: &str) -> Result<String, AiError> {
        let config = self.config.as_ref().ok_or(AiError::Disabled)?;

        let url = format!(
            "{}/chat/completions",
            config.base_url.trim_end_matches('/')
        );
        let payload = ChatRequest {
            model: &config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: kind.system_message(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: kind.temperature(),
        };

        tracing::debug!(kind = kind.as_str(), model = %config.model, "Requesting completion");

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AiError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(AiError::EmptyResponse)?;

        Ok(content)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}
