//! Wall-clock access for the poller.

use std::{ops::Deref, sync::Arc};

use chrono::{DateTime, Utc};

/// Generic clock trait.
///
/// The poller reads the current time through this trait so the watermark can
/// be driven deterministically in tests.
pub trait GenericClock: Send + Sync + 'static {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl GenericClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock handle.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Clock {
    inner: Arc<dyn GenericClock>,
}

impl Deref for Clock {
    type Target = dyn GenericClock;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl Clock {
    /// Wrap a clock implementation.
    pub fn new(inner: Arc<dyn GenericClock>) -> Self {
        Self { inner }
    }

    /// A handle to the system wall clock.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::system()
    }
}
