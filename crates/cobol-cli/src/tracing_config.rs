//! Tracing setup for the `cobol-symbols` binary.
//!
//! Logging is opt-in. Set `COBOL_LS_LOG` (or `RUST_LOG`) to a filter and
//! pick the output with `COBOL_LS_LOG_FORMAT`:
//!
//! - `text` (default): flat `tracing-subscriber` lines
//! - `tree`: indented spans via `tracing-tree`, handy for following one
//!   registration pass
//! - `json`: one JSON object per event
//!
//! ```bash
//! COBOL_LS_LOG=debug COBOL_LS_LOG_FORMAT=tree cobol-symbols tree.json diagnostics
//! COBOL_LS_LOG="cobol_symbols::service_code_blocks=trace" cobol-symbols tree.json symbols
//! ```
//!
//! Everything is written to stderr; stdout carries only the JSON result.

use std::str::FromStr;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

pub const LOG_ENV: &str = "COBOL_LS_LOG";
pub const LOG_FORMAT_ENV: &str = "COBOL_LS_LOG_FORMAT";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Tree,
    Json,
}

impl FromStr for LogFormat {
    type Err = std::convert::Infallible;

    /// Unknown values fall back to `Text`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value.trim().to_ascii_lowercase().as_str() {
            "tree" => LogFormat::Tree,
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        })
    }
}

impl LogFormat {
    fn from_env() -> Self {
        std::env::var(LOG_FORMAT_ENV)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }
}

/// The filter to install, or `None` when logging was not requested.
/// `COBOL_LS_LOG` wins over `RUST_LOG`.
fn filter_from_env() -> Option<EnvFilter> {
    if let Ok(directives) = std::env::var(LOG_ENV) {
        return Some(EnvFilter::builder().parse_lossy(directives));
    }
    std::env::var("RUST_LOG")
        .is_ok()
        .then(EnvFilter::from_default_env)
}

/// Install the global subscriber if logging was requested. Calling it twice
/// keeps the first subscriber.
pub fn init_tracing() {
    let Some(filter) = filter_from_env() else {
        return;
    };

    let installed = match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_writer(std::io::stderr)
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_targets(true);
            Registry::default().with(filter).with(tree_layer).try_init()
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).try_init()
        }
        LogFormat::Text => {
            let text_layer = fmt::layer().with_writer(std::io::stderr);
            Registry::default().with(filter).with(text_layer).try_init()
        }
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
