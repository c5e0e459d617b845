// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;
use thiserror::Error;

pub const ENV_DB: &str = "IPODESK_DB";
pub const ENV_PAGE_SIZE: &str = "IPODESK_PAGE_SIZE";
pub const ENV_LOG: &str = "IPODESK_LOG";

const DEFAULT_LOG_FILTER: &str = "warn";

/// Errors related to environment-driven configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is set but cannot be used.
    #[error("Invalid value '{value}' for {name}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Process-level settings read once at startup.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Overrides the platform data dir location of the database.
    pub db_path: Option<PathBuf>,
    /// Overrides the page size stored in the `settings` table.
    pub page_size: Option<usize>,
    pub log_filter: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let db_path = non_empty(ENV_DB).map(|v| PathBuf::from(v.trim()));
        let page_size = match non_empty(ENV_PAGE_SIZE) {
            Some(raw) => Some(parse_page_size(ENV_PAGE_SIZE, &raw)?),
            None => None,
        };
        let log_filter = non_empty(ENV_LOG)
            .or_else(|| non_empty("RUST_LOG"))
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            db_path,
            page_size,
            log_filter,
        })
    }
}

fn parse_page_size(name: &'static str, raw: &str) -> Result<usize, ConfigError> {
    let invalid = |reason| ConfigError::InvalidValue {
        name,
        value: raw.to_string(),
        reason,
    };
    let n = raw
        .trim()
        .parse::<usize>()
        .map_err(|_| invalid("expected a positive integer"))?;
    if n == 0 {
        return Err(invalid("page size must be at least 1"));
    }
    Ok(n)
}
