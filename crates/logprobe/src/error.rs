// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for decoding captured output and loading configuration.

use thiserror::Error;

/// Errors raised while turning the capture buffer into records
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("cannot decode record {index}: {source}")]
    Malformed {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that can occur when loading a [`FormatConfig`](crate::FormatConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read format config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid format config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
