use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use chrono::{Local, NaiveDateTime};

/// Source of time for the engine: a monotonic instant for elapsed arithmetic
/// and the local wall clock for log timestamps and clock-time targets.
pub trait Clock: Send {
    fn instant(&self) -> Instant;
    fn wall(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn instant(&self) -> Instant {
        Instant::now()
    }

    fn wall(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<Mutex<ManualInner>>,
}

#[derive(Debug)]
struct ManualInner {
    instant: Instant,
    wall: NaiveDateTime,
}

impl ManualClock {
    pub fn new(wall: NaiveDateTime) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ManualInner {
                instant: Instant::now(),
                wall,
            })),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.lock();
        guard.instant += by;
        guard.wall += chrono::Duration::from_std(by).unwrap_or(chrono::Duration::zero());
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Clock for ManualClock {
    fn instant(&self) -> Instant {
        self.lock().instant
    }

    fn wall(&self) -> NaiveDateTime {
        self.lock().wall
    }
}
