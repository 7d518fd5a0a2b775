//! Store-and-Forward Buffer
//!
//! ## Overview
//!
//! When a payload cannot be delivered it is appended to a JSON-lines buffer
//! file on the SD card. Later, usually on a timer in the main loop, a replay
//! pass walks the file and tries every line again. Lines that go through are
//! dropped; lines that fail again are carried forward, in order, into a
//! rewritten buffer.
//!
//! ```text
//! publish ──fail──▶ BufferStore::store ──append──▶ /buffer.jsonl
//!
//! ReplayEngine::retry_buffered_sends
//!   /buffer.jsonl ──line──▶ Transport::send ──ok──▶ (dropped)
//!                                           └─fail─▶ /temp.jsonl
//!   /temp.jsonl ──durable swap──▶ /buffer.jsonl
//! ```
//!
//! ## Lifecycle of the Buffer File
//!
//! ```text
//! STABLE ──replay──▶ REPLAYING ──swap──▶ STABLE' (survivors only)
//!                        └── temp file cannot be created ──▶ STABLE (untouched)
//! ```
//!
//! ## Invariants
//!
//! - Appends never rewrite existing lines
//! - After a completed pass the buffer holds exactly the records that failed
//!   again, in their original relative order
//! - Blank lines are dropped permanently, whatever the transport says
//! - An engine-level failure never loses buffered data
//!
//! ## Crash Recovery
//!
//! If power is lost after the old buffer was removed but before the staged
//! file was renamed, the next pass finds the temp file without a buffer and
//! promotes it. With an atomic rename ([`crate::storage::FileStorage`]) the old
//! buffer stays authoritative until the swap, so records delivered during an
//! interrupted pass are delivered again (at-least-once).
//!
//! ## Usage Example
//!
//! ```rust
//! use fieldlog_core::buffer::{BufferStore, ReplayEngine, ReplayReport};
//! use fieldlog_core::records::BufferRecord;
//! use fieldlog_core::sink::{LogSink, RetryPolicy};
//! use fieldlog_core::storage::MemoryStorage;
//! use fieldlog_core::time::StdDelay;
//! use fieldlog_core::traits::Transport;
//!
//! struct Offline;
//!
//! impl Transport for Offline {
//!     type Error = &'static str;
//!     fn post(&mut self, _url: &str, _payload: &str) -> Result<u16, Self::Error> {
//!         Err("no route to host")
//!     }
//! }
//!
//! let mut sink = LogSink::new(MemoryStorage::new(), StdDelay).with_policy(RetryPolicy::new(1, 0));
//! let store = BufferStore::default();
//! store.store(&mut sink, &BufferRecord::new(r#"{"temperature":21.0}"#)?)?;
//!
//! let engine = ReplayEngine::new("https://api.example.com/sensor");
//! let report = engine.retry_buffered_sends(sink.storage_mut(), &mut Offline)?;
//! assert!(matches!(report, ReplayReport::Completed(stats) if stats.retained == 1));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod replay;
pub mod store;

pub use replay::{ReplayEngine, ReplayReport, ReplayStats};
pub use store::BufferStore;
