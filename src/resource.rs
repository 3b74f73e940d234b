//! ResourceArc Wrappers
//!
//! Persistent state for chunk-fed address tracking.

use std::sync::Mutex;

use rustler::ResourceArc;

use crate::error::{AddressError, Result};
use crate::strategy::StreamingTracker;

/// Wrapper for StreamingTracker that can be stored in a ResourceArc.
/// Holds `None` once the tracker has been finished.
pub struct TrackerResource {
    pub inner: Mutex<Option<StreamingTracker>>,
}

impl TrackerResource {
    pub fn new() -> Self {
        TrackerResource {
            inner: Mutex::new(Some(StreamingTracker::new())),
        }
    }

    /// Run `f` against the live tracker.
    ///
    /// # Errors
    ///
    /// Returns `"mutex_poisoned"` if the tracker mutex is poisoned.
    /// The closure sees `AddressError::Finished` through `Err` when the
    /// tracker is gone.
    pub fn with_tracker<F, R>(&self, f: F) -> std::result::Result<Result<R>, &'static str>
    where
        F: FnOnce(&mut StreamingTracker) -> Result<R>,
    {
        let mut guard = self.inner.lock().map_err(|_| "mutex_poisoned")?;
        Ok(match guard.as_mut() {
            Some(tracker) => f(tracker),
            None => Err(AddressError::Finished),
        })
    }

    /// Take the tracker out, leaving the resource finished
    pub fn take(&self) -> std::result::Result<Result<StreamingTracker>, &'static str> {
        let mut guard = self.inner.lock().map_err(|_| "mutex_poisoned")?;
        Ok(guard.take().ok_or(AddressError::Finished))
    }
}

#[rustler::resource_impl]
impl rustler::Resource for TrackerResource {}

impl Default for TrackerResource {
    fn default() -> Self {
        Self::new()
    }
}

/// Type alias for the ResourceArc
pub type TrackerRef = ResourceArc<TrackerResource>;
