//! Replays a recorded session log through the decoders and the aggregator.
//!
//! The log is JSON lines, one event per line:
//!
//! ```text
//! {"at": 1700000000000, "type": "start"}
//! {"at": 1700000000500, "type": "connected", "device": "hrm"}
//! {"at": 1700000001000, "type": "notification", "device": "hrm",
//!  "characteristic": "00002a37-0000-1000-8000-00805f9b34fb", "data": [0, 142]}
//! {"type": "location", "latitude": 45.0, "longitude": 7.0, "speed": 5.2, "timestamp": 1700000001000}
//! {"at": 1700000060000, "type": "stop"}
//! ```
//!
//! `at` is the wall-clock time in Unix milliseconds the event was delivered.
//! It may be omitted on `location` events, which then use the fix timestamp.

use crate::location::LocationPoint;
use crate::recording::aggregator::RideAggregator;
use crate::recording::clock::ManualClock;
use crate::recording::types::{RecorderConfig, RecordingStatus, RideSummary};
use crate::sensors::hub::SensorHub;
use crate::sensors::types::ConnectionState;
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// One line of a session log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayRecord {
    /// Delivery time in Unix milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<i64>,
    /// What happened
    #[serde(flatten)]
    pub event: ReplayEvent,
}

/// Events a session log can contain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayEvent {
    /// Session start command
    Start,
    /// Session pause command
    Pause,
    /// Session resume command
    Resume,
    /// Session stop command
    Stop,
    /// Location fix
    Location(LocationPoint),
    /// Characteristic notification payload
    Notification {
        device: String,
        characteristic: Uuid,
        data: Vec<u8>,
    },
    /// Sensor connected
    Connected { device: String },
    /// Sensor disconnected
    Disconnected { device: String },
}

/// Errors from reading a session log.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Failed to read the log
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A line is not a valid event
    #[error("Invalid event on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Drives a sensor hub and an aggregator from replayed events.
pub struct Replayer {
    clock: ManualClock,
    hub: SensorHub,
    aggregator: RideAggregator,
    summaries: Vec<RideSummary>,
    events_applied: usize,
}

impl Replayer {
    /// Create a replayer with the given recorder configuration.
    pub fn new(config: RecorderConfig) -> Self {
        let clock = ManualClock::default();
        let aggregator = RideAggregator::with_clock(config, Arc::new(clock.clone()));
        Self {
            clock,
            hub: SensorHub::new(),
            aggregator,
            summaries: Vec::new(),
            events_applied: 0,
        }
    }

    /// Apply one event.
    pub fn apply(&mut self, record: ReplayRecord) {
        let at = match (&record.at, &record.event) {
            (Some(at), _) => Some(*at),
            (None, ReplayEvent::Location(point)) => Some(point.timestamp),
            (None, _) => None,
        };
        if let Some(at) = at {
            self.clock.set_millis(at);
        }

        match record.event {
            ReplayEvent::Start => self.aggregator.start(),
            ReplayEvent::Pause => self.aggregator.pause(),
            ReplayEvent::Resume => self.aggregator.resume(),
            ReplayEvent::Stop => {
                if let Some(summary) = self.aggregator.stop() {
                    self.summaries.push(summary);
                }
            }
            ReplayEvent::Location(point) => self.aggregator.process_point(point),
            ReplayEvent::Notification {
                device,
                characteristic,
                data,
            } => {
                if let Some(reading) = self.hub.handle_notification(&device, &characteristic, &data)
                {
                    self.aggregator.apply_reading(&reading);
                }
            }
            ReplayEvent::Connected { device } => {
                self.hub.connection_changed(&device, ConnectionState::Connected)
            }
            ReplayEvent::Disconnected { device } => {
                self.hub.connection_changed(&device, ConnectionState::Disconnected)
            }
        }

        self.events_applied += 1;
    }

    /// Number of events applied so far.
    pub fn events_applied(&self) -> usize {
        self.events_applied
    }

    /// The aggregator being driven.
    pub fn aggregator(&self) -> &RideAggregator {
        &self.aggregator
    }

    /// The sensor hub being driven.
    pub fn hub(&self) -> &SensorHub {
        &self.hub
    }

    /// Stop any unfinished session and return every session summary.
    pub fn finish(mut self) -> Vec<RideSummary> {
        if matches!(
            self.aggregator.status(),
            RecordingStatus::Recording | RecordingStatus::Paused
        ) {
            tracing::warn!("Log ended without stop, closing session");
            if let Some(summary) = self.aggregator.stop() {
                self.summaries.push(summary);
            }
        }
        self.summaries
    }
}

/// Parse one log line. Blank lines yield `None`.
pub fn parse_line(line: &str, line_number: usize) -> Result<Option<ReplayRecord>, ReplayError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|source| ReplayError::Parse {
            line: line_number,
            source,
        })
}

/// Replay a whole log and return the summaries of the sessions it contains.
pub fn replay_reader<R: BufRead>(
    reader: R,
    config: RecorderConfig,
) -> Result<Vec<RideSummary>, ReplayError> {
    let mut replayer = Replayer::new(config);

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if let Some(record) = parse_line(&line, index + 1)? {
            replayer.apply(record);
        }
    }

    tracing::info!("Replayed {} events", replayer.events_applied());
    Ok(replayer.finish())
}

/// Replay a log file.
pub fn replay_file(path: &Path, config: RecorderConfig) -> Result<Vec<RideSummary>, ReplayError> {
    let file = std::fs::File::open(path)?;
    replay_reader(std::io::BufReader::new(file), config)
}
