//! Node Configuration
//!
//! Read from `config.conf` on the SD card at boot:
//!
//! ```text
//! ssid=greenhouse
//! password=hunter2
//! session=spring-trial
//! sleep_time=300
//! url_logs=https://collector.example/logs
//! url_sensor=https://collector.example/sensor
//! ```
//!
//! One `key=value` per line. Keys and values are trimmed, the first
//! occurrence of a key wins and unknown keys are ignored. An empty or absent
//! `password` selects an open network.

use crate::constants::files::{BUFFER_FILE, CERT_FILE, CONFIG_FILE, LOG_FILE, TEMP_FILE};
use crate::errors::ConfigError;
use crate::storage::Storage;

/// Deep-sleep interval when `sleep_time` is not set
pub const DEFAULT_SLEEP_SECS: u16 = 60;

/// Everything the node needs to know at boot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// WiFi network name
    pub ssid: String,
    /// WPA2 passphrase, `None` for an open network
    pub password: Option<String>,
    /// Recording session sent with every sample
    pub session: String,
    /// Seconds to deep-sleep between samples
    pub sleep_time: u16,
    /// Endpoint receiving [`LogRecord`](crate::records::LogRecord)s
    pub url_logs: String,
    /// Endpoint receiving [`SensorRecord`](crate::records::SensorRecord)s
    pub url_sensor: String,
    /// Event log file
    pub log_path: String,
    /// Undelivered payloads
    pub buffer_path: String,
    /// Staging file for replay passes
    pub temp_path: String,
    /// PEM bundle for the collector's CA
    pub cert_path: String,
}

impl NodeConfig {
    /// Config with default paths and sleep interval
    pub fn new(
        ssid: impl Into<String>,
        session: impl Into<String>,
        url_logs: impl Into<String>,
        url_sensor: impl Into<String>,
    ) -> Self {
        Self {
            ssid: ssid.into(),
            password: None,
            session: session.into(),
            sleep_time: DEFAULT_SLEEP_SECS,
            url_logs: url_logs.into(),
            url_sensor: url_sensor.into(),
            log_path: LOG_FILE.to_owned(),
            buffer_path: BUFFER_FILE.to_owned(),
            temp_path: TEMP_FILE.to_owned(),
            cert_path: CERT_FILE.to_owned(),
        }
    }

    /// Set the WPA2 passphrase
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        let password = password.into();
        self.password = (!password.is_empty()).then_some(password);
        self
    }

    /// Set the deep-sleep interval
    pub fn with_sleep_time(mut self, secs: u16) -> Self {
        self.sleep_time = secs;
        self
    }

    /// Override the event log path
    pub fn with_log_path(mut self, path: impl Into<String>) -> Self {
        self.log_path = path.into();
        self
    }

    /// Override the buffer and staging paths
    pub fn with_buffer_paths(mut self, buffer: impl Into<String>, temp: impl Into<String>) -> Self {
        self.buffer_path = buffer.into();
        self.temp_path = temp.into();
        self
    }

    /// Override the CA bundle path
    pub fn with_cert_path(mut self, path: impl Into<String>) -> Self {
        self.cert_path = path.into();
        self
    }

    /// Parse `key=value` text
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Self::from_lines(text.lines())
    }

    /// Parse `key=value` lines
    pub fn from_lines<I, L>(lines: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let mut raw = RawConfig::default();
        for line in lines {
            raw.feed(line.as_ref());
        }
        raw.finish()
    }

    /// Read [`CONFIG_FILE`] through `storage`
    pub fn load_from<S: Storage>(storage: &mut S) -> Result<Self, ConfigError> {
        Self::load_path(storage, CONFIG_FILE)
    }

    /// Read a configuration file at `path`
    pub fn load_path<S: Storage>(storage: &mut S, path: &str) -> Result<Self, ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_owned(),
            source,
        };

        let lines = storage
            .read_lines(path)
            .map_err(io_err)?
            .map(|line| line.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(io_err)?;

        let config = Self::from_lines(lines)?;
        log::info!("SD | Configuration loaded from {}", path);
        Ok(config)
    }

    /// PEM text of the CA bundle, `None` when no bundle is on the card
    pub fn load_ca_cert<S: Storage>(&self, storage: &mut S) -> Result<Option<String>, ConfigError> {
        if !storage.exists(&self.cert_path) {
            log::warn!("SD | No certificate at {}, using built-in roots", self.cert_path);
            return Ok(None);
        }

        let io_err = |source| ConfigError::Io {
            path: self.cert_path.clone(),
            source,
        };

        let mut pem = String::new();
        for line in storage.read_lines(&self.cert_path).map_err(io_err)? {
            pem.push_str(&String::from_utf8_lossy(&line.map_err(io_err)?));
            pem.push('\n');
        }
        Ok(Some(pem))
    }
}

/// Keys seen so far; first occurrence wins
#[derive(Default)]
struct RawConfig {
    ssid: Option<String>,
    password: Option<String>,
    session: Option<String>,
    sleep_time: Option<String>,
    url_logs: Option<String>,
    url_sensor: Option<String>,
}

impl RawConfig {
    fn feed(&mut self, line: &str) {
        let Some((key, value)) = line.trim().split_once('=') else {
            return;
        };
        let slot = match key.trim() {
            "ssid" => &mut self.ssid,
            "password" => &mut self.password,
            "session" => &mut self.session,
            "sleep_time" => &mut self.sleep_time,
            "url_logs" => &mut self.url_logs,
            "url_sensor" => &mut self.url_sensor,
            _ => return,
        };
        if slot.is_none() {
            *slot = Some(value.trim().to_owned());
        }
    }

    fn finish(self) -> Result<NodeConfig, ConfigError> {
        let required = |value: Option<String>, key| {
            value
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let mut config = NodeConfig::new(
            required(self.ssid, "ssid")?,
            required(self.session, "session")?,
            required(self.url_logs, "url_logs")?,
            required(self.url_sensor, "url_sensor")?,
        );

        if let Some(password) = self.password {
            config = config.with_password(password);
        }

        if let Some(raw) = self.sleep_time {
            let secs = raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "sleep_time",
                value: raw.clone(),
            })?;
            config = config.with_sleep_time(secs);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    const SAMPLE: &str = "\
ssid=greenhouse
password = hunter2
session=spring-trial
sleep_time=300
url_logs=https://collector.example/logs
url_sensor=https://collector.example/sensor
";

    #[test]
    fn parses_all_keys() {
        let config = NodeConfig::parse(SAMPLE).unwrap();
        assert_eq!(config.ssid, "greenhouse");
        assert_eq!(config.password.as_deref(), Some("hunter2"));
        assert_eq!(config.session, "spring-trial");
        assert_eq!(config.sleep_time, 300);
        assert_eq!(config.url_sensor, "https://collector.example/sensor");
        assert_eq!(config.buffer_path, BUFFER_FILE);
        assert_eq!(config.temp_path, TEMP_FILE);
    }

    #[test]
    fn first_match_wins_and_unknown_keys_ignored() {
        let text = format!("ssid=first\ncolour=blue\n# comment\n{SAMPLE}");
        let config = NodeConfig::parse(&text).unwrap();
        assert_eq!(config.ssid, "first");
    }

    #[test]
    fn empty_password_means_open_network() {
        let text = SAMPLE.replace("password = hunter2", "password=");
        assert_eq!(NodeConfig::parse(&text).unwrap().password, None);
    }

    #[test]
    fn missing_required_key() {
        let text = SAMPLE.replace("url_sensor", "url_other");
        assert!(matches!(
            NodeConfig::parse(&text),
            Err(ConfigError::Missing("url_sensor"))
        ));
    }

    #[test]
    fn malformed_sleep_time() {
        let text = SAMPLE.replace("300", "five minutes");
        match NodeConfig::parse(&text) {
            Err(ConfigError::Invalid { key, value }) => {
                assert_eq!(key, "sleep_time");
                assert_eq!(value, "five minutes");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn sleep_time_defaults() {
        let text = SAMPLE.replace("sleep_time=300\n", "");
        assert_eq!(NodeConfig::parse(&text).unwrap().sleep_time, DEFAULT_SLEEP_SECS);
    }

    #[test]
    fn loads_through_storage() {
        let mut storage = MemoryStorage::new().with_file(CONFIG_FILE, SAMPLE);
        let config = NodeConfig::load_from(&mut storage).unwrap();
        assert_eq!(config.session, "spring-trial");

        assert!(matches!(
            NodeConfig::load_path(&mut storage, "/missing.conf"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn ca_cert_is_optional() {
        let config = NodeConfig::parse(SAMPLE).unwrap();
        let mut storage = MemoryStorage::new();
        assert_eq!(config.load_ca_cert(&mut storage).unwrap(), None);

        let pem = "-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n";
        let mut storage = MemoryStorage::new().with_file(CERT_FILE, pem);
        assert_eq!(config.load_ca_cert(&mut storage).unwrap().as_deref(), Some(pem));
    }
}
