// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./engram.toml` > `~/.config/engram/engram.toml`
//! > `/etc/engram/engram.toml` with environment variable overrides via the
//! `ENGRAM_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::EngramConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/engram/engram.toml` (system-wide)
/// 3. `~/.config/engram/engram.toml` (user XDG config)
/// 4. `./engram.toml` (local directory)
/// 5. `ENGRAM_*` environment variables
pub fn load_config() -> Result<EngramConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EngramConfig::default()))
        .merge(Toml::file("/etc/engram/engram.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("engram/engram.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("engram.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<EngramConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EngramConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<EngramConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EngramConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `ENGRAM_STORAGE_DATA_DIR` must map to
/// `storage.data_dir`, not `storage.data.dir`.
fn env_provider() -> Env {
    Env::prefixed("ENGRAM_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("log_", "log.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn load_from_str_with_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.server.port, 8077);
        assert_eq!(config.storage.data_dir, "./data");
    }

    #[test]
    fn load_from_str_overrides_defaults() {
        let toml = r#"
            [server]
            port = 9000

            [storage]
            data_dir = "/tmp/engram-test"
        "#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.storage.data_dir, "/tmp/engram-test");
        // Untouched sections keep their defaults.
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.log.level, "info");
    }

    #[test]
    #[serial]
    fn env_vars_override_toml() {
        // Env vars mutate process state, hence #[serial].
        unsafe {
            std::env::set_var("ENGRAM_SERVER_PORT", "7171");
            std::env::set_var("ENGRAM_STORAGE_DATA_DIR", "/tmp/engram-env");
        }

        let config = load_config().unwrap();
        assert_eq!(config.server.port, 7171);
        assert_eq!(config.storage.data_dir, "/tmp/engram-env");

        unsafe {
            std::env::remove_var("ENGRAM_SERVER_PORT");
            std::env::remove_var("ENGRAM_STORAGE_DATA_DIR");
        }
    }

    #[test]
    #[serial]
    fn underscore_keys_map_to_sections_not_nested_keys() {
        unsafe {
            std::env::set_var("ENGRAM_LOG_LEVEL", "debug");
        }

        let config = load_config().unwrap();
        assert_eq!(config.log.level, "debug");

        unsafe {
            std::env::remove_var("ENGRAM_LOG_LEVEL");
        }
    }
}
