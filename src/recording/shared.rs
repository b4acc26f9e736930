//! Thread-safe handle to a ride aggregator.
//!
//! Use this when location fixes and sensor notifications are delivered on
//! different threads. Every call takes one short lock.

use crate::location::LocationPoint;
use crate::recording::aggregator::RideAggregator;
use crate::recording::types::{RecordingStatus, RideDataPoint, RideStats, RideSummary};
use crate::sensors::types::SensorReading;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// Cloneable, lock-protected [`RideAggregator`]. Clones drive the same session.
#[derive(Clone)]
pub struct SharedRideAggregator {
    inner: Arc<Mutex<RideAggregator>>,
}

impl SharedRideAggregator {
    /// Wrap an aggregator.
    pub fn new(aggregator: RideAggregator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(aggregator)),
        }
    }

    // Aggregator methods never leave it half-updated, so a poisoned lock is still usable
    fn lock(&self) -> MutexGuard<'_, RideAggregator> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// See [`RideAggregator::start`].
    pub fn start(&self) {
        self.lock().start();
    }

    /// See [`RideAggregator::process_point`].
    pub fn process_point(&self, point: LocationPoint) {
        self.lock().process_point(point);
    }

    /// See [`RideAggregator::pause`].
    pub fn pause(&self) {
        self.lock().pause();
    }

    /// See [`RideAggregator::resume`].
    pub fn resume(&self) {
        self.lock().resume();
    }

    /// See [`RideAggregator::stop`].
    pub fn stop(&self) -> Option<RideSummary> {
        self.lock().stop()
    }

    /// See [`RideAggregator::update_heart_rate`].
    pub fn update_heart_rate(&self, bpm: u16) {
        self.lock().update_heart_rate(bpm);
    }

    /// See [`RideAggregator::update_power`].
    pub fn update_power(&self, watts: u16, cadence: Option<u16>) {
        self.lock().update_power(watts, cadence);
    }

    /// See [`RideAggregator::apply_reading`].
    pub fn apply_reading(&self, reading: &SensorReading) {
        self.lock().apply_reading(reading);
    }

    /// Current session status.
    pub fn status(&self) -> RecordingStatus {
        self.lock().status()
    }

    /// Identifier of the current or last session.
    pub fn session_id(&self) -> Option<Uuid> {
        self.lock().session_id()
    }

    /// Copy of the live statistics.
    pub fn stats(&self) -> RideStats {
        self.lock().stats()
    }

    /// Copy of the samples recorded so far.
    pub fn data_points(&self) -> Vec<RideDataPoint> {
        self.lock().data_points().to_vec()
    }

    /// Run a closure with exclusive access to the aggregator.
    pub fn with<R>(&self, f: impl FnOnce(&mut RideAggregator) -> R) -> R {
        f(&mut *self.lock())
    }
}

impl From<RideAggregator> for SharedRideAggregator {
    fn from(aggregator: RideAggregator) -> Self {
        Self::new(aggregator)
    }
}
