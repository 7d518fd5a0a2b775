//! Shared fixtures for integration tests
//!
//! - SD card fixtures on a real filesystem (`tempfile`)
//! - Scripted transports standing in for the collector
//! - A delay that records instead of sleeping

#![allow(dead_code)]

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use embedded_hal::delay::DelayNs;
use fieldlog_core::storage::FileStorage;
use fieldlog_core::traits::Transport;
use tempfile::TempDir;

pub const ENDPOINT: &str = "https://collector.test/sensor";

/// Fresh card backed by a temporary directory
pub fn card() -> (TempDir, FileStorage) {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = FileStorage::mount(dir.path()).expect("mount");
    (dir, storage)
}

/// Card with `/buffer.jsonl` seeded from `lines`
pub fn card_with_buffer(lines: &[&str]) -> (TempDir, FileStorage) {
    let (dir, storage) = card();
    let mut contents = lines.join("\n");
    contents.push('\n');
    fs::write(dir.path().join("buffer.jsonl"), contents).expect("seed buffer");
    (dir, storage)
}

/// Lines of a file on the card, or `None` if it does not exist
pub fn read_lines(dir: &Path, name: &str) -> Option<Vec<String>> {
    fs::read_to_string(dir.join(name))
        .ok()
        .map(|text| text.lines().map(str::to_owned).collect())
}

/// Collector that accepts everything
#[derive(Default)]
pub struct AcceptAll {
    pub received: Vec<String>,
}

impl Transport for AcceptAll {
    type Error = String;

    fn post(&mut self, _url: &str, payload: &str) -> Result<u16, Self::Error> {
        self.received.push(payload.to_owned());
        Ok(200)
    }
}

/// Collector that is unreachable
#[derive(Default)]
pub struct Unreachable {
    pub attempts: usize,
}

impl Transport for Unreachable {
    type Error = String;

    fn post(&mut self, _url: &str, _payload: &str) -> Result<u16, Self::Error> {
        self.attempts += 1;
        Err("connection refused".into())
    }
}

/// Collector that rejects a fixed set of payloads with a 503
#[derive(Default)]
pub struct Rejecting {
    pub reject: HashSet<String>,
    pub attempted: Vec<String>,
}

impl Rejecting {
    pub fn new<'a>(reject: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            reject: reject.into_iter().map(str::to_owned).collect(),
            attempted: Vec::new(),
        }
    }
}

impl Transport for Rejecting {
    type Error = String;

    fn post(&mut self, _url: &str, payload: &str) -> Result<u16, Self::Error> {
        self.attempted.push(payload.to_owned());
        if self.reject.contains(payload) {
            Ok(503)
        } else {
            Ok(201)
        }
    }
}

/// Records requested delays instead of sleeping
#[derive(Default)]
pub struct RecordingDelay {
    pub delays_ms: Vec<u32>,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delays_ms.push(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays_ms.push(ms);
    }
}

/// JSON payload for sample `n`
pub fn payload(n: usize) -> String {
    format!(r#"{{"record_session":"it","dht11_number":1,"temperature":{n}.0}}"#)
}
