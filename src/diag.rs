//! Diagnostic subscriber convenience.
//!
//! The pipeline emits its `tracing` spans/events unconditionally; whether
//! anything renders them is entirely up to the caller. This module exists
//! only so a caller who doesn't already run their own subscriber (a CLI, a
//! quick script, a test harness) can opt into a reasonable default with one
//! call instead of pulling in `tracing-subscriber` directly.

use std::sync::Once;

static INIT: Once = Once::new();

/// Install a default `EnvFilter`-driven `fmt` subscriber as the global
/// default, once per process. Controlled by the `RUST_LOG` environment
/// variable (defaults to `info` when unset). Safe to call more than once;
/// later calls are no-ops.
pub fn install_default_subscriber() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    });
}
