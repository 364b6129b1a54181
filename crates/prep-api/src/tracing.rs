//! Log output for the server.
//!
//! Development prints pretty, colored, multi-line events with source
//! locations. Production prints one JSON object per event, flattened, with the
//! current span (and so the request ID) attached.
//!
//! `RUST_LOG` overrides the default filter of either mode, e.g.
//! `RUST_LOG=prep_api=trace,sqlx=info`.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Environment;

const DEVELOPMENT_FILTER: &str = "debug,prep_api=debug,tower_http=debug,sqlx=warn,hyper=info,reqwest=info";
const PRODUCTION_FILTER: &str = "info,tower_http=info,sqlx=warn,hyper=warn";

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

pub fn init_tracing(env: &Environment) {
    if env.is_development() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_file(true)
                    .pretty()
                    .with_filter(filter(DEVELOPMENT_FILTER)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .flatten_event(true)
                    .with_target(true)
                    .with_filter(filter(PRODUCTION_FILTER)),
            )
            .init();
    }

    tracing::info!(environment = ?env, "Tracing initialized");
}
