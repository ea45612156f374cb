//! CLI configuration via environment variables
//!
//! tagtest reads a few optional environment variables for output defaults.
//! Command-line flags always override them.

use std::env;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Default to JSON output (TAGTEST_FORMAT=json)
    pub default_json: bool,
    /// Disable colored output (TAGTEST_NO_COLOR=1 or NO_COLOR=1)
    pub no_color: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            default_json: lookup("TAGTEST_FORMAT")
                .map(|v| v.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            no_color: lookup("TAGTEST_NO_COLOR").is_some() || lookup("NO_COLOR").is_some(),
        }
    }
}
