//! # Temblor
//!
//! A terminal earthquake monitor: polls a public seismic-data feed,
//! shows nearby events on a map and list, and raises a local alarm when a
//! significant event is detected close to you.
//!
//! ## Architecture
//!
//! Temblor follows a modular pipeline architecture:
//!
//! ```text
//! Feed adapter → Poller → Alert evaluator → Alarm sink
//!                                         → TUI
//! ```
//!
//! - [`fetcher`]: one adapter per data source, normalizing each provider's
//!   native JSON into common earthquake records
//! - [`poller`]: fetch-and-evaluate cycles with the cross-poll snapshot
//! - [`alert`]: significant/novel classification and alarm deduplication
//! - [`tui`]: terminal user interface built with ratatui
//!
//! ## Quick start
//!
//! ```bash
//! # Watch nearby earthquakes (5-minute polls)
//! temblor
//!
//! # One-shot fetch from a specific source
//! temblor poll --source EMSC
//!
//! # Check the alarm works
//! temblor test-alarm
//! ```

/// Application context and error types.
pub mod app;

/// Significant-event detection, alarm deduplication, and alarm sinks.
pub mod alert;

/// Command-line interface using clap.
pub mod cli;

/// Configuration and the two persisted preferences (data source and
/// magnitude filter).
pub mod config;

/// Core domain models: earthquake records, sources, coordinates,
/// great-circle distance.
pub mod domain;

/// Feed adapters for the supported seismic data sources.
pub mod fetcher;

/// Startup geolocation with config override and fixed fallback.
pub mod location;

/// Poll cycles: fetch, evaluate, snapshot bookkeeping.
pub mod poller;

/// Terminal user interface.
///
/// Map canvas on top, event list below, emergency banner and status bar.
/// Keybindings: j/k navigate, s cycles the source, 1-5 set the magnitude
/// filter, t toggles the test alarm, i shows safety info, R refreshes,
/// q quits.
pub mod tui;
