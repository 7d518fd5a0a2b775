//! Node Orchestration
//!
//! Ties the capabilities together for the firmware's main loop:
//!
//! ```text
//! boot ─▶ connect ─▶ log_event("SYSTEM", ...) ─▶ loop {
//!     sample ─▶ publish ─┬─ link up & 2xx ─▶ done
//!                        └─ otherwise ─────▶ buffer
//!     every N minutes ─▶ retry_buffered_sends
//! }
//! ```
//!
//! Log events go to the SD event log and, when the link is up, to the log
//! endpoint. They are never buffered; only sensor samples are replayed.

use embedded_hal::delay::DelayNs;

use crate::buffer::{BufferStore, ReplayEngine, ReplayReport};
use crate::config::NodeConfig;
use crate::errors::{PublishError, ReplayResult, SinkResult};
use crate::records::{BufferRecord, LogRecord, SensorRecord};
use crate::sink::LogSink;
use crate::storage::Storage;
use crate::traits::{wait_for_link, Link, LinkWait, Transport};

/// What happened to a published sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The sensor endpoint accepted it
    Sent,
    /// Stored in the buffer for a later replay pass
    Buffered,
}

/// One sensing node
pub struct Node<S, D, L, T> {
    config: NodeConfig,
    sink: LogSink<S, D>,
    store: BufferStore,
    engine: ReplayEngine,
    link: L,
    transport: T,
}

impl<S, D, L, T> Node<S, D, L, T>
where
    S: Storage,
    D: DelayNs,
    L: Link,
    T: Transport,
{
    /// Node with buffer and replay paths taken from `config`
    pub fn new(config: NodeConfig, sink: LogSink<S, D>, link: L, transport: T) -> Self {
        let store = BufferStore::new(config.buffer_path.clone());
        let engine = ReplayEngine::new(config.url_sensor.clone())
            .with_paths(config.buffer_path.clone(), config.temp_path.clone());
        Self {
            config,
            sink,
            store,
            engine,
            link,
            transport,
        }
    }

    /// Associate with the configured network, waiting up to the default timeout
    pub fn connect(&mut self) -> bool {
        self.connect_with(LinkWait::default())
    }

    /// Associate with the configured network
    pub fn connect_with(&mut self, wait: LinkWait) -> bool {
        let started = self
            .link
            .connect(&self.config.ssid, self.config.password.as_deref());
        let connected = started && wait_for_link(&self.link, self.sink.delay_mut(), wait);

        // Append failures are already logged by the sink
        let _ = if connected {
            self.log_event("WIFI", "Connected to WiFi!")
        } else {
            self.log_event("WIFI", "Error: could not connect to WiFi.")
        };
        connected
    }

    /// Reconnect if the link dropped
    ///
    /// Returns `true` when a reconnect was requested.
    pub fn check_link(&mut self) -> bool {
        if self.link.is_connected() {
            return false;
        }
        let _ = self.log_event("WIFI", "Disconnected. Attempting to reconnect...");
        self.link.reconnect();
        true
    }

    /// Turn the radio off before sleeping
    pub fn radio_off(&mut self) {
        let _ = self.log_event("WIFI", "Turning WiFi off...");
        self.link.power_off();
    }

    /// Turn the radio back on after waking
    pub fn radio_on(&mut self) {
        self.link.power_on();
        let _ = self.log_event("WIFI", "Turning WiFi on...");
    }

    /// Record an event locally and, when online, remotely
    ///
    /// The remote copy is best effort. The returned result is the SD append.
    pub fn log_event(&mut self, tag: &str, msg: &str) -> SinkResult<()> {
        let record = LogRecord::new(tag, msg);
        log::info!("{}", record.log_line());

        let written = self.sink.append(&self.config.log_path, &record.log_line());

        if self.link.is_connected() {
            match BufferRecord::from_payload(&record) {
                Ok(json) => {
                    self.transport.send(&self.config.url_logs, json.as_str());
                }
                Err(e) => log::warn!("HTTP_CLIENT | Could not encode log event: {}", e),
            }
        }

        written
    }

    /// Deliver a sample, buffering it when that is not possible
    pub fn publish(&mut self, sample: &SensorRecord) -> Result<Delivery, PublishError> {
        let record = sample.to_record()?;

        if self.link.is_connected() {
            if self.transport.send(&self.config.url_sensor, record.as_str()) {
                return Ok(Delivery::Sent);
            }
        } else {
            log::info!("WIFI | Offline, buffering sample.");
        }

        self.store.store(&mut self.sink, &record)?;
        Ok(Delivery::Buffered)
    }

    /// Replay the buffer if the link is up
    ///
    /// `Ok(None)` means the pass was skipped because the node is offline.
    pub fn retry_buffered_sends(&mut self) -> ReplayResult<Option<ReplayReport>> {
        if !self.link.is_connected() {
            log::debug!("BUFFER | Offline, replay skipped.");
            return Ok(None);
        }
        self.engine
            .retry_buffered_sends(self.sink.storage_mut(), &mut self.transport)
            .map(Some)
    }

    /// Records waiting in the buffer
    pub fn pending(&mut self) -> std::io::Result<usize> {
        self.store.pending(self.sink.storage_mut())
    }

    /// Active configuration
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// The WiFi link
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// The HTTP transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// The SD sink
    pub fn sink_mut(&mut self) -> &mut LogSink<S, D> {
        &mut self.sink
    }
}
