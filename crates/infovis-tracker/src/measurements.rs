//! Measured destination points, shared between the input path and the render loop.

use log::debug;
use nalgebra::Point3;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MeasurementError {
    #[error("all {capacity} correspondences are already measured")]
    Full { capacity: usize },
    #[error("measured point has non-finite coordinates")]
    NonFinite,
}

/// Append / remove-at-tail list of measured points.
///
/// Clones share the same list. Every operation holds the lock for its whole
/// duration, so [`snapshot`](Self::snapshot) never observes a partial append.
#[derive(Clone, Debug)]
pub struct MeasurementLog {
    points: Arc<Mutex<Vec<Point3<f64>>>>,
    capacity: usize,
}

impl MeasurementLog {
    /// Log accepting at most `capacity` points (the model point count).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Arc::new(Mutex::new(Vec::with_capacity(capacity))),
            capacity,
        }
    }

    // A panic while holding the lock cannot leave a half-written point behind.
    fn lock(&self) -> MutexGuard<'_, Vec<Point3<f64>>> {
        self.points.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Append the next correspondence. Returns the new length.
    pub fn push(&self, point: Point3<f64>) -> Result<usize, MeasurementError> {
        if point.coords.iter().any(|v| !v.is_finite()) {
            return Err(MeasurementError::NonFinite);
        }
        let mut points = self.lock();
        if points.len() >= self.capacity {
            return Err(MeasurementError::Full {
                capacity: self.capacity,
            });
        }
        points.push(point);
        debug!("measurement {} recorded at {:?}", points.len() - 1, point);
        Ok(points.len())
    }

    /// Append the point `next(len)` computed from the current length, under the
    /// same lock as the append. `None` from `next` reports the log as full.
    pub fn push_with<F>(&self, next: F) -> Result<usize, MeasurementError>
    where
        F: FnOnce(usize) -> Option<Point3<f64>>,
    {
        let mut points = self.lock();
        let full = MeasurementError::Full {
            capacity: self.capacity,
        };
        if points.len() >= self.capacity {
            return Err(full);
        }
        let point = next(points.len()).ok_or(full)?;
        if point.coords.iter().any(|v| !v.is_finite()) {
            return Err(MeasurementError::NonFinite);
        }
        points.push(point);
        debug!("measurement {} recorded at {:?}", points.len() - 1, point);
        Ok(points.len())
    }

    /// Remove the most recent correspondence.
    pub fn undo(&self) -> Option<Point3<f64>> {
        self.lock().pop()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Consistent copy of the current list.
    pub fn snapshot(&self) -> Vec<Point3<f64>> {
        self.lock().clone()
    }
}
