// FBGL
// copyright zipxing@hotmail.com 2022～2025

//! Runtime configuration.
//!
//! Defaults are overridden by an optional TOML file and then by the
//! environment:
//!
//! | variable        | field      | example        |
//! |-----------------|------------|----------------|
//! | `FBGL_DEVICE`   | `device`   | `/dev/fb1`     |
//! | `FBGL_EMULATE`  | `emulate`  | `1`, `true`    |
//! | `FBGL_SHM_KEY`  | `shm_key`  | `0x1234FBCD`   |
//! | `FBGL_LOG`      | `log_level`| `debug`        |
//!
//! ```ignore
//! init_config(FbglConfig::load(Some("fbgl.toml"))?);
//! let surface = Surface::open(SurfaceSource::from_path(None))?;
//! ```

use crate::error::{FbglError, Result};
use crate::{DEFAULT_FB, DEFAULT_SHM_KEY};
use serde::Deserialize;
use std::sync::OnceLock;
use std::{env, fs};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FbglConfig {
    /// Device opened for the default source
    pub device: String,
    /// Redirect every /dev/fb* path to the shared memory surface
    pub emulate: bool,
    /// SysV key of the emulation segment
    pub shm_key: i32,
    pub log_level: String,
    pub log_file: String,
}

impl Default for FbglConfig {
    fn default() -> Self {
        Self {
            device: DEFAULT_FB.to_string(),
            emulate: false,
            shm_key: DEFAULT_SHM_KEY,
            log_level: "info".to_string(),
            log_file: "log/fbgl.log".to_string(),
        }
    }
}

impl FbglConfig {
    /// Defaults, then `path` (if given), then the environment.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_toml_file(p)?,
            None => Self::default(),
        };
        cfg.apply_env(|k| env::var(k).ok())?;
        Ok(cfg)
    }

    pub fn from_toml_file(path: &str) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| FbglError::Config(e.to_string()))
    }

    /// Applies overrides from a variable lookup (the process environment in
    /// `load`, a map in tests).
    pub fn apply_env<F>(&mut self, get: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(d) = get("FBGL_DEVICE") {
            self.device = d;
        }
        if let Some(e) = get("FBGL_EMULATE") {
            self.emulate = parse_bool(&e)?;
        }
        if let Some(k) = get("FBGL_SHM_KEY") {
            self.shm_key = parse_key(&k)?;
        }
        if let Some(l) = get("FBGL_LOG") {
            self.log_level = l;
        }
        Ok(())
    }
}

fn parse_bool(s: &str) -> Result<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(FbglError::Config(format!("bad boolean {:?}", s))),
    }
}

/// Accepts decimal or 0x-prefixed hex. Keys above i32::MAX wrap the same
/// way key_t does in C.
pub fn parse_key(s: &str) -> Result<i32> {
    let t = s.trim();
    let v = match t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).map(|v| v as i32),
        None => t.parse::<i32>(),
    };
    v.map_err(|_| FbglError::Config(format!("bad shm key {:?}", s)))
}

/// Global configuration, set once at startup.
pub static FBGL_CONFIG: OnceLock<FbglConfig> = OnceLock::new();

/// Initialize the global configuration. Later calls are ignored.
pub fn init_config(cfg: FbglConfig) {
    let _ = FBGL_CONFIG.set(cfg);
}

/// Global configuration; defaults plus environment if never initialized.
pub fn get_config() -> &'static FbglConfig {
    FBGL_CONFIG.get_or_init(|| FbglConfig::load(None).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let c = FbglConfig::default();
        assert_eq!(c.device, "/dev/fb0");
        assert!(!c.emulate);
        assert_eq!(c.shm_key, 0x1234FBCD);
    }

    #[test]
    fn test_toml_partial_keeps_defaults() {
        let c = FbglConfig::from_toml_str("emulate = true\nlog_level = \"debug\"\n").unwrap();
        assert!(c.emulate);
        assert_eq!(c.log_level, "debug");
        assert_eq!(c.device, "/dev/fb0");
    }

    #[test]
    fn test_toml_error() {
        assert!(matches!(
            FbglConfig::from_toml_str("emulate = \"maybe\""),
            Err(FbglError::Config(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("FBGL_DEVICE", "/dev/fb1"),
            ("FBGL_EMULATE", "yes"),
            ("FBGL_SHM_KEY", "0xBEEF"),
        ]
        .into_iter()
        .collect();
        let mut c = FbglConfig::default();
        c.apply_env(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(c.device, "/dev/fb1");
        assert!(c.emulate);
        assert_eq!(c.shm_key, 0xBEEF);
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(parse_key("42").unwrap(), 42);
        assert_eq!(parse_key("0x1234FBCD").unwrap(), 0x1234FBCD);
        assert_eq!(parse_key("0xFFFFFFFF").unwrap(), -1);
        assert!(parse_key("key").is_err());
    }

    #[test]
    fn test_bad_bool() {
        let mut c = FbglConfig::default();
        let r = c.apply_env(|k| (k == "FBGL_EMULATE").then(|| "sometimes".to_string()));
        assert!(matches!(r, Err(FbglError::Config(_))));
    }
}
