use sqlx::PgPool;

use crate::{
    ApiConfig,
    ai::{AiClient, AiError},
    config::Environment,
};

#[derive(Clone)]
pub struct ApiState {
    pub pool: PgPool,
    pub ai: AiClient,
    pub environment: Environment,
}

impl ApiState {
    pub fn new(config: &ApiConfig, pool: PgPool) -> Result<Self, AiError> {
        let ai_config = config.ai_config();
        if ai_config.is_none() {
            tracing::warn!("AI generation not configured (missing AI_API_KEY), serving fallbacks");
        }

        Ok(Self {
            pool,
            ai: AiClient::new(ai_config)?,
            environment: config.env,
        })
    }
}
