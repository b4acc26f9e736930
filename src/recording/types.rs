//! Recording types for ride statistics and the per-fix sample log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::location::LocationPoint;

/// Default speed (m/s) above which the rider counts as moving.
pub const DEFAULT_MOVING_SPEED_THRESHOLD_MS: f64 = 1.0;

/// Status of a recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordingStatus {
    /// No session started yet
    #[default]
    Idle,
    /// Actively recording
    Recording,
    /// Recording paused
    Paused,
    /// Session ended; a new start begins a fresh session
    Stopped,
}

impl std::fmt::Display for RecordingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordingStatus::Idle => write!(f, "Idle"),
            RecordingStatus::Recording => write!(f, "Recording"),
            RecordingStatus::Paused => write!(f, "Paused"),
            RecordingStatus::Stopped => write!(f, "Stopped"),
        }
    }
}

/// Cumulative statistics for the current session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RideStats {
    /// Total distance in meters
    pub distance_m: f64,
    /// Wall-clock time since start, excluding pauses, in seconds
    pub elapsed_time_s: f64,
    /// Time spent above the moving threshold in seconds
    pub moving_time_s: f64,
    /// Distance over moving time in m/s
    pub avg_speed_ms: f64,
    /// Highest reported speed in m/s
    pub max_speed_ms: f64,
    /// Sum of positive altitude changes in meters
    pub elevation_gain_m: f64,
    /// Latest reported speed in m/s
    pub current_speed_ms: f64,
}

/// One sample per location fix received while recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideDataPoint {
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    /// WGS84 latitude in degrees
    pub latitude: f64,
    /// WGS84 longitude in degrees
    pub longitude: f64,
    /// Altitude in meters
    pub altitude: Option<f64>,
    /// Speed in m/s, never negative
    pub speed: f64,
    /// Latest heart rate in BPM
    pub heart_rate: Option<u16>,
    /// Latest power in watts
    pub power: Option<u16>,
    /// Latest cadence in RPM
    pub cadence: Option<u16>,
}

impl RideDataPoint {
    /// Create a sample from a fix, with no sensor values.
    pub fn from_location(point: &LocationPoint, speed: f64) -> Self {
        Self {
            timestamp: point.timestamp,
            latitude: point.latitude,
            longitude: point.longitude,
            altitude: point.altitude,
            speed,
            heart_rate: None,
            power: None,
            cadence: None,
        }
    }
}

/// Everything recorded in a finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideSummary {
    /// Session identifier
    pub id: Uuid,
    /// Statistics at the time the session stopped
    pub stats: RideStats,
    /// Sample log in arrival order
    pub data_points: Vec<RideDataPoint>,
    /// Session start
    pub started_at: DateTime<Utc>,
    /// Session end
    pub ended_at: DateTime<Utc>,
    /// Average of non-zero heart rate readings
    pub avg_heart_rate: Option<u16>,
    /// Maximum heart rate reading
    pub max_heart_rate: Option<u16>,
    /// Average of non-zero power readings
    pub avg_power: Option<u16>,
    /// Maximum power reading
    pub max_power: Option<u16>,
}

impl RideSummary {
    /// Wall-clock duration of the session, pauses included.
    pub fn wall_duration(&self) -> chrono::Duration {
        self.ended_at - self.started_at
    }
}

/// Configuration for the ride aggregator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecorderConfig {
    /// Speed (m/s) that must be exceeded for time to count as moving
    pub moving_speed_threshold_ms: f64,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            moving_speed_threshold_ms: DEFAULT_MOVING_SPEED_THRESHOLD_MS,
        }
    }
}
