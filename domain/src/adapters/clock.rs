//! Clock implementations for the `Clock` port.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::Clock;

/// Wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Clock that only moves when told to. Millisecond resolution.
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicU64,
}

impl ManualClock {
    /// Start at `millis` milliseconds after the Unix epoch.
    pub fn at_millis(millis: u64) -> Self {
        Self {
            millis: AtomicU64::new(millis),
        }
    }

    /// Move forward by `by`; saturates at `u64::MAX` milliseconds.
    pub fn advance(&self, by: Duration) {
        let step = to_millis(by);
        let _ = self
            .millis
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |cur| {
                Some(cur.saturating_add(step))
            });
    }

    /// Jump to `t`. Times before the epoch clamp to the epoch.
    pub fn set(&self, t: SystemTime) {
        let millis = t.duration_since(UNIX_EPOCH).map(to_millis).unwrap_or(0);
        self.millis.store(millis, Ordering::Relaxed);
    }
}

fn to_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(self.millis.load(Ordering::Relaxed))
    }
}
