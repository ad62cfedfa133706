//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Default filter when neither `CARE_ALERTS_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "care_alerts=info,tower_http=info";

/// Initialize logging.
///
/// Reads `CARE_ALERTS_LOG`, then `RUST_LOG`, for per-target levels, e.g.
/// `CARE_ALERTS_LOG=care_alerts_core=debug,tower_http=warn`. Safe to call
/// more than once.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("CARE_ALERTS_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(filter)
            .init();
    });
}
