pub mod ai;
pub mod analytics;
pub mod config;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod mock_test;
pub mod practice;
pub mod progress;
pub mod question;
pub mod router;
pub mod state;
pub mod study_plan;
pub mod syllabus;
pub mod tracing;
pub mod user;
pub mod v1;
pub mod validation;

pub use config::ApiConfig;
pub use state::ApiState;
