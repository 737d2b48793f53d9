//! Tracing subscriber setup.
//!
//! Output is off unless `ZEILE_LOG` or `RUST_LOG` holds a filter, e.g.
//! `ZEILE_LOG=zeile_eval=trace`. `ZEILE_LOG_TREE=1` switches to an indented
//! span tree.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter variable checked before `RUST_LOG`.
pub const LOG_ENV: &str = "ZEILE_LOG";

/// Selects the hierarchical span tree output.
pub const TREE_ENV: &str = "ZEILE_LOG_TREE";

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let Some(filter) = env_filter() else {
            return;
        };

        if std::env::var_os(TREE_ENV).is_some() {
            tracing_subscriber::registry()
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_bracketed_fields(true),
                )
                .with(filter)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

fn env_filter() -> Option<EnvFilter> {
    if std::env::var_os(LOG_ENV).is_some() {
        return EnvFilter::try_from_env(LOG_ENV).ok();
    }
    if std::env::var_os("RUST_LOG").is_some() {
        return Some(EnvFilter::from_default_env());
    }
    None
}
