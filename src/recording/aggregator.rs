//! Ride aggregator fusing location fixes and sensor readings into ride statistics.
//!
//! Location fixes arrive through [`RideAggregator::process_point`]; heart rate
//! and power arrive independently through [`RideAggregator::update_heart_rate`]
//! and [`RideAggregator::update_power`]. Each fix while recording updates the
//! cumulative [`RideStats`] and appends one [`RideDataPoint`] carrying the most
//! recent sensor values.
//!
//! Calls that do not fit the current [`RecordingStatus`] are ignored rather
//! than reported as errors.

use crate::location::LocationPoint;
use crate::metrics::session::RunningStat;
use crate::recording::clock::{Clock, SystemClock};
use crate::recording::types::{
    RecorderConfig, RecordingStatus, RideDataPoint, RideStats, RideSummary,
};
use crate::sensors::types::SensorReading;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Aggregates one recording session at a time.
pub struct RideAggregator {
    /// Configuration
    config: RecorderConfig,
    /// Wall-clock source
    clock: Arc<dyn Clock>,
    /// Current session status
    status: RecordingStatus,
    /// Identifier of the current or last session
    session_id: Option<Uuid>,
    /// Cumulative statistics
    stats: RideStats,
    /// Samples recorded this session
    data_points: Vec<RideDataPoint>,
    /// Previous fix used for deltas
    last_point: Option<LocationPoint>,
    /// Session start
    started_at: Option<DateTime<Utc>>,
    /// When the current pause began
    pause_started_at: Option<DateTime<Utc>>,
    /// Total paused wall-clock time in milliseconds
    total_paused_ms: i64,
    /// Latest non-zero heart rate
    current_heart_rate: u16,
    /// Latest non-zero power
    current_power: u16,
    /// Latest non-zero cadence
    current_cadence: u16,
    /// Session heart rate average/max
    heart_rate_stat: RunningStat,
    /// Session power average/max
    power_stat: RunningStat,
}

impl RideAggregator {
    /// Create an aggregator driven by the system clock.
    pub fn new(config: RecorderConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create an aggregator with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(RecorderConfig::default())
    }

    /// Create an aggregator driven by the given clock.
    pub fn with_clock(config: RecorderConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            status: RecordingStatus::Idle,
            session_id: None,
            stats: RideStats::default(),
            data_points: Vec::new(),
            last_point: None,
            started_at: None,
            pause_started_at: None,
            total_paused_ms: 0,
            current_heart_rate: 0,
            current_power: 0,
            current_cadence: 0,
            heart_rate_stat: RunningStat::new(),
            power_stat: RunningStat::new(),
        }
    }

    /// Start a new session, discarding anything left from the previous one.
    ///
    /// Ignored while a session is recording or paused.
    pub fn start(&mut self) {
        if matches!(
            self.status,
            RecordingStatus::Recording | RecordingStatus::Paused
        ) {
            tracing::debug!("start() ignored: session already {}", self.status);
            return;
        }

        let session_id = Uuid::new_v4();
        self.session_id = Some(session_id);
        self.stats = RideStats::default();
        self.data_points.clear();
        self.last_point = None;
        self.started_at = Some(self.clock.now());
        self.pause_started_at = None;
        self.total_paused_ms = 0;
        self.heart_rate_stat.reset();
        self.power_stat.reset();
        self.status = RecordingStatus::Recording;

        tracing::info!("Started recording session {}", session_id);
    }

    /// Fold a location fix into the session.
    ///
    /// Fixes must arrive in timestamp order. Ignored unless recording.
    pub fn process_point(&mut self, point: LocationPoint) {
        if self.status != RecordingStatus::Recording {
            tracing::debug!("Location fix ignored while {}", self.status);
            return;
        }

        let speed = point.speed.unwrap_or(0.0).max(0.0);
        self.stats.current_speed_ms = speed;
        if speed > self.stats.max_speed_ms {
            self.stats.max_speed_ms = speed;
        }

        if let Some(last) = &self.last_point {
            self.stats.distance_m += last.distance_to(&point);

            let time_diff_s = (point.timestamp - last.timestamp) as f64 / 1000.0;
            if speed > self.config.moving_speed_threshold_ms {
                self.stats.moving_time_s += time_diff_s;
            }

            if let (Some(previous), Some(current)) = (last.altitude, point.altitude) {
                let climb = current - previous;
                if climb > 0.0 {
                    self.stats.elevation_gain_m += climb;
                }
            }
        }

        self.stats.elapsed_time_s = self.active_millis() as f64 / 1000.0;
        self.stats.avg_speed_ms = if self.stats.moving_time_s > 0.0 {
            self.stats.distance_m / self.stats.moving_time_s
        } else {
            0.0
        };

        let mut sample = RideDataPoint::from_location(&point, speed);
        sample.heart_rate = (self.current_heart_rate > 0).then_some(self.current_heart_rate);
        sample.power = (self.current_power > 0).then_some(self.current_power);
        sample.cadence = (self.current_cadence > 0).then_some(self.current_cadence);
        self.data_points.push(sample);

        self.last_point = Some(point);

        tracing::trace!(
            "Fix {}: distance {:.1} m, moving {:.1} s, gain {:.1} m",
            point.timestamp,
            self.stats.distance_m,
            self.stats.moving_time_s,
            self.stats.elevation_gain_m
        );
    }

    /// Pause the session. Ignored unless recording.
    pub fn pause(&mut self) {
        if self.status != RecordingStatus::Recording {
            tracing::debug!("pause() ignored while {}", self.status);
            return;
        }

        self.pause_started_at = Some(self.clock.now());
        self.status = RecordingStatus::Paused;
        tracing::info!("Paused recording");
    }

    /// Resume a paused session. Ignored unless paused.
    pub fn resume(&mut self) {
        if self.status != RecordingStatus::Paused {
            tracing::debug!("resume() ignored while {}", self.status);
            return;
        }

        if let Some(paused_at) = self.pause_started_at.take() {
            self.total_paused_ms += (self.clock.now() - paused_at).num_milliseconds();
        }
        self.status = RecordingStatus::Recording;
        tracing::info!("Resumed recording");
    }

    /// End the session and return everything it recorded.
    ///
    /// Returns `None` if no session is recording or paused.
    pub fn stop(&mut self) -> Option<RideSummary> {
        if !matches!(
            self.status,
            RecordingStatus::Recording | RecordingStatus::Paused
        ) {
            tracing::debug!("stop() ignored while {}", self.status);
            return None;
        }

        let ended_at = self.clock.now();
        let started_at = self.started_at.unwrap_or(ended_at);
        self.status = RecordingStatus::Stopped;
        self.pause_started_at = None;

        let summary = RideSummary {
            id: self.session_id.unwrap_or_else(Uuid::nil),
            stats: self.stats,
            data_points: self.data_points.clone(),
            started_at,
            ended_at,
            avg_heart_rate: self.heart_rate_stat.average(),
            max_heart_rate: self.heart_rate_stat.max(),
            avg_power: self.power_stat.average(),
            max_power: self.power_stat.max(),
        };

        tracing::info!(
            "Stopped recording session {} with {} samples, {:.0} m",
            summary.id,
            summary.data_points.len(),
            summary.stats.distance_m
        );

        Some(summary)
    }

    /// Supply a heart rate reading. Zero means no data and is ignored.
    pub fn update_heart_rate(&mut self, bpm: u16) {
        if bpm > 0 {
            self.current_heart_rate = bpm;
            self.heart_rate_stat.add(bpm);
        }
    }

    /// Supply a power reading and optional cadence. Zero means no data and is ignored.
    pub fn update_power(&mut self, watts: u16, cadence: Option<u16>) {
        if watts > 0 {
            self.current_power = watts;
            self.power_stat.add(watts);
        }
        if let Some(rpm) = cadence.filter(|rpm| *rpm > 0) {
            self.current_cadence = rpm;
        }
    }

    /// Supply a decoded sensor reading.
    pub fn apply_reading(&mut self, reading: &SensorReading) {
        match reading {
            SensorReading::HeartRate(hr) => self.update_heart_rate(hr.heart_rate),
            SensorReading::Power(power) => self.update_power(power.instant_power, power.cadence),
        }
    }

    /// Get the current session status.
    pub fn status(&self) -> RecordingStatus {
        self.status
    }

    /// Get the identifier of the current or last session.
    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    /// Get a copy of the live statistics.
    pub fn stats(&self) -> RideStats {
        self.stats
    }

    /// Get the samples recorded so far.
    pub fn data_points(&self) -> &[RideDataPoint] {
        &self.data_points
    }

    /// Get the latest non-zero heart rate.
    pub fn current_heart_rate(&self) -> Option<u16> {
        (self.current_heart_rate > 0).then_some(self.current_heart_rate)
    }

    /// Get the latest non-zero power.
    pub fn current_power(&self) -> Option<u16> {
        (self.current_power > 0).then_some(self.current_power)
    }

    /// Get the latest non-zero cadence.
    pub fn current_cadence(&self) -> Option<u16> {
        (self.current_cadence > 0).then_some(self.current_cadence)
    }

    /// Get the configuration.
    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// Wall-clock milliseconds since start, excluding completed pauses.
    fn active_millis(&self) -> i64 {
        match self.started_at {
            Some(started_at) => {
                (self.clock.now() - started_at).num_milliseconds() - self.total_paused_ms
            }
            None => 0,
        }
    }
}

impl Default for RideAggregator {
    fn default() -> Self {
        Self::with_defaults()
    }
}
