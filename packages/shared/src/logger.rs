//! Logging setup utilities for roomcast binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Both the server library crate and the binary are enabled at
/// `default_log_level`; `tower_http` request traces follow the same level.
/// The filter can be overridden with the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "roomcast-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use roomcast_shared::logger::setup_logger;
///
/// setup_logger("roomcast-server", "info");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Targets enabled next to the binary itself.
const LIBRARY_TARGETS: [&str; 2] = ["roomcast_server", "tower_http"];

fn default_directives(binary_name: &str, default_log_level: &str) -> String {
    let binary_target = binary_name.replace('-', "_");

    let mut targets: Vec<&str> = LIBRARY_TARGETS.to_vec();
    // バイナリ名とライブラリ名が同じ場合は 1 つにまとめる
    if !targets.contains(&binary_target.as_str()) {
        targets.insert(1, binary_target.as_str());
    }

    targets
        .iter()
        .map(|target| format!("{target}={default_log_level}"))
        .collect::<Vec<_>>()
        .join(",")
}
