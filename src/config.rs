//! Typed settings store
//!
//! Settings are plain strings keyed by `SettingKey`, layered from a JSON
//! file, then `PARADE_*` environment variables, then command-line values.
//! Each later layer overwrites the earlier ones. Values are parsed on
//! lookup, so a malformed value only fails the caller that needs it.

use crate::net::protocol::HANDSHAKE_TIMEOUT;
use crate::{ParadeError, Result};
use rustc_hash::FxHashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Prefix for environment overrides, e.g. `PARADE_PORT`
pub const ENV_PREFIX: &str = "PARADE_";

/// Default wait when dialing a host
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Every setting the program understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Host,
    Port,
    Threads,
    TimeoutMs,
    Verbosity,
    Seed,
}

impl SettingKey {
    pub const ALL: [SettingKey; 6] = [
        SettingKey::Host,
        SettingKey::Port,
        SettingKey::Threads,
        SettingKey::TimeoutMs,
        SettingKey::Verbosity,
        SettingKey::Seed,
    ];

    /// Name used in settings files
    pub fn name(&self) -> &'static str {
        match self {
            SettingKey::Host => "host",
            SettingKey::Port => "port",
            SettingKey::Threads => "threads",
            SettingKey::TimeoutMs => "timeout_ms",
            SettingKey::Verbosity => "verbosity",
            SettingKey::Seed => "seed",
        }
    }

    /// Environment variable that overrides this key
    pub fn env_var(&self) -> String {
        format!("{}{}", ENV_PREFIX, self.name().to_ascii_uppercase())
    }

    pub fn from_name(name: &str) -> Option<SettingKey> {
        SettingKey::ALL.into_iter().find(|key| key.name() == name)
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Layered key/value settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    values: FxHashMap<SettingKey, String>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a flat JSON object of scalars, e.g. `{"host": "0.0.0.0", "port": 7000}`
    pub fn from_json_str(text: &str) -> Result<Self> {
        let parsed: serde_json::Value = serde_json::from_str(text)?;
        let object = parsed.as_object().ok_or_else(|| {
            ParadeError::InvalidSetting("settings file must hold a JSON object".to_string())
        })?;

        let mut settings = Settings::new();
        for (name, value) in object {
            let key = SettingKey::from_name(name)
                .ok_or_else(|| ParadeError::InvalidSetting(format!("unknown setting '{}'", name)))?;
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                other => {
                    return Err(ParadeError::InvalidSetting(format!(
                        "setting '{}' must be a string, number or boolean, got {}",
                        name, other
                    )))
                }
            };
            settings.values.insert(key, text);
        }
        Ok(settings)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Apply `PARADE_*` overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|var| std::env::var(var).ok());
    }

    /// Apply overrides from any variable lookup
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for key in SettingKey::ALL {
            if let Some(value) = lookup(&key.env_var()) {
                self.values.insert(key, value);
            }
        }
    }

    pub fn set(&mut self, key: SettingKey, value: impl ToString) {
        self.values.insert(key, value.to_string());
    }

    /// Set `key` only if `value` is present
    pub fn set_opt<T: ToString>(&mut self, key: SettingKey, value: Option<T>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    pub fn contains(&self, key: SettingKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn get_string(&self, key: SettingKey) -> Result<String> {
        self.values
            .get(&key)
            .cloned()
            .ok_or_else(|| ParadeError::InvalidSetting(format!("missing setting '{}'", key)))
    }

    pub fn get_int(&self, key: SettingKey) -> Result<i64> {
        let raw = self.get_string(key)?;
        raw.trim().parse::<i64>().map_err(|_| {
            ParadeError::InvalidSetting(format!("setting '{}' is not an integer: '{}'", key, raw))
        })
    }

    /// Unsigned lookup for values that use the full `u64` range, such as seeds
    pub fn get_u64(&self, key: SettingKey) -> Result<u64> {
        let raw = self.get_string(key)?;
        raw.trim().parse::<u64>().map_err(|_| {
            ParadeError::InvalidSetting(format!(
                "setting '{}' is not an unsigned integer: '{}'",
                key, raw
            ))
        })
    }

    pub fn get_bool(&self, key: SettingKey) -> Result<bool> {
        let raw = self.get_string(key)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(ParadeError::InvalidSetting(format!(
                "setting '{}' is not a boolean: '{}'",
                key, raw
            ))),
        }
    }

    /// Check everything network mode needs, once, at startup
    ///
    /// `host`, `port`, `threads` and `timeout_ms` are all required.
    /// `threads` must be positive. `timeout_ms` bounds each remote turn;
    /// 0 means no limit.
    pub fn validate_network(&self) -> Result<NetworkSettings> {
        let host = self.get_string(SettingKey::Host)?;
        if host.trim().is_empty() {
            return Err(ParadeError::InvalidSetting("setting 'host' is empty".to_string()));
        }

        let port = self.get_int(SettingKey::Port)?;
        let port = u16::try_from(port).map_err(|_| {
            ParadeError::InvalidSetting(format!("setting 'port' out of range: {}", port))
        })?;

        let threads = self.get_int(SettingKey::Threads)?;
        if threads < 1 {
            return Err(ParadeError::InvalidSetting(format!(
                "setting 'threads' must be at least 1, got {}",
                threads
            )));
        }

        let timeout_ms = self.get_int(SettingKey::TimeoutMs)?;
        if timeout_ms < 0 {
            return Err(ParadeError::InvalidSetting(format!(
                "setting 'timeout_ms' must not be negative, got {}",
                timeout_ms
            )));
        }

        Ok(NetworkSettings {
            host,
            port,
            threads: threads as usize,
            turn_timeout: (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms as u64)),
            ..NetworkSettings::default()
        })
    }
}

/// Validated settings for hosting or joining a game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSettings {
    pub host: String,
    pub port: u16,
    /// Worker threads for the async runtime
    pub threads: usize,
    /// Longest wait for a remote player's move; `None` waits indefinitely
    pub turn_timeout: Option<Duration>,
    pub handshake_timeout: Duration,
    pub connect_timeout: Duration,
}

impl NetworkSettings {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        NetworkSettings {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// `host:port`, as accepted by bind and connect
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for NetworkSettings {
    fn default() -> Self {
        NetworkSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
            threads: 2,
            turn_timeout: None,
            handshake_timeout: HANDSHAKE_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_values_become_strings() {
        let settings = Settings::from_json_str(
            r#"{"host": "0.0.0.0", "port": 7000, "verbosity": "verbose", "seed": 42}"#,
        )
        .unwrap();

        assert_eq!(settings.get_string(SettingKey::Host).unwrap(), "0.0.0.0");
        assert_eq!(settings.get_int(SettingKey::Port).unwrap(), 7000);
        assert_eq!(settings.get_int(SettingKey::Seed).unwrap(), 42);
        assert!(!settings.contains(SettingKey::Threads));
    }

    #[test]
    fn test_json_rejects_unknown_and_nested() {
        assert!(matches!(
            Settings::from_json_str(r#"{"colour": "red"}"#),
            Err(ParadeError::InvalidSetting(_))
        ));
        assert!(matches!(
            Settings::from_json_str(r#"{"port": [1]}"#),
            Err(ParadeError::InvalidSetting(_))
        ));
        assert!(matches!(
            Settings::from_json_str("[]"),
            Err(ParadeError::InvalidSetting(_))
        ));
        assert!(matches!(
            Settings::from_json_str("{"),
            Err(ParadeError::SerializationError(_))
        ));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut settings = Settings::from_json_str(r#"{"port": 7000}"#).unwrap();
        settings.apply_env_from(|var| match var {
            "PARADE_PORT" => Some("7100".to_string()),
            "PARADE_TIMEOUT_MS" => Some("250".to_string()),
            _ => None,
        });

        assert_eq!(settings.get_int(SettingKey::Port).unwrap(), 7100);
        assert_eq!(settings.get_int(SettingKey::TimeoutMs).unwrap(), 250);
        assert_eq!(SettingKey::TimeoutMs.env_var(), "PARADE_TIMEOUT_MS");
    }

    #[test]
    fn test_typed_getters() {
        let mut settings = Settings::new();
        settings.set(SettingKey::Seed, "abc");
        settings.set(SettingKey::Verbosity, "Yes");

        assert!(matches!(
            settings.get_int(SettingKey::Seed),
            Err(ParadeError::InvalidSetting(_))
        ));
        assert!(settings.get_bool(SettingKey::Verbosity).unwrap());
        assert!(matches!(
            settings.get_bool(SettingKey::Seed),
            Err(ParadeError::InvalidSetting(_))
        ));
        assert!(matches!(
            settings.get_string(SettingKey::Host),
            Err(ParadeError::InvalidSetting(_))
        ));
    }

    #[test]
    fn test_seed_uses_full_u64_range() {
        let mut settings = Settings::new();
        settings.set_opt(SettingKey::Seed, Some(u64::MAX));
        assert_eq!(settings.get_u64(SettingKey::Seed).unwrap(), u64::MAX);

        settings.set(SettingKey::Seed, -3);
        assert!(matches!(
            settings.get_u64(SettingKey::Seed),
            Err(ParadeError::InvalidSetting(_))
        ));
    }

    #[test]
    fn test_validate_network_requires_every_key() {
        let mut settings = Settings::new();
        let steps = [
            (SettingKey::Host, "127.0.0.1"),
            (SettingKey::Port, "7000"),
            (SettingKey::Threads, "2"),
        ];
        for (key, value) in steps {
            assert!(matches!(
                settings.validate_network(),
                Err(ParadeError::InvalidSetting(_))
            ));
            settings.set(key, value);
        }
        assert!(matches!(
            settings.validate_network(),
            Err(ParadeError::InvalidSetting(_))
        ));

        settings.set(SettingKey::TimeoutMs, 0);
        let network = settings.validate_network().unwrap();
        assert_eq!(network.addr(), "127.0.0.1:7000");
        assert_eq!(network.threads, 2);
        assert_eq!(network.turn_timeout, None);
        assert_eq!(network.handshake_timeout, Duration::from_secs(10));

        settings.set(SettingKey::Port, 70000);
        assert!(matches!(
            settings.validate_network(),
            Err(ParadeError::InvalidSetting(_))
        ));
    }

    #[test]
    fn test_validate_network_threads_and_timeout() {
        let mut settings = Settings::new();
        settings.set(SettingKey::Host, "localhost");
        settings.set(SettingKey::Port, 0);
        settings.set(SettingKey::TimeoutMs, 0);
        settings.set(SettingKey::Threads, 0);
        assert!(settings.validate_network().is_err());

        settings.set(SettingKey::Threads, 4);
        settings.set(SettingKey::TimeoutMs, 1500);
        let network = settings.validate_network().unwrap();
        assert_eq!(network.threads, 4);
        assert_eq!(network.turn_timeout, Some(Duration::from_millis(1500)));

        settings.set(SettingKey::TimeoutMs, -1);
        assert!(settings.validate_network().is_err());
    }
}
