//! AI completion integration: client, prompt templates, response parsing and
//! the `/ai/*` routes.

pub mod client;
pub mod parse;
pub mod prompts;
pub mod routes;

pub use client::{AiClient, AiConfig, GenerationKind};
pub use routes::routes;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI generation is not configured")]
    Disabled,
    #[error("AI returned an empty response")]
    EmptyResponse,
    #[error("AI request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("AI returned an unusable response: {0}")]
    InvalidResponse(String),
}
