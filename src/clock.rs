use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};

/// How a wait ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    Elapsed,
    Cancelled,
}

/// A one-shot cancellation flag that can be tripped from another thread,
/// e.g. a signal handler, and wakes anyone blocked in `wait_timeout`.
#[derive(Debug, Clone, Default)]
pub struct Cancel {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl Cancel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        let (lock, cvar) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner) = true;
        cvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks for `timeout` or until cancelled, whichever comes first
    pub fn wait_timeout(&self, timeout: Duration) -> Wake {
        let (lock, cvar) = &*self.inner;
        let guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = cvar
            .wait_timeout_while(guard, timeout, |cancelled| !*cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        if *guard {
            Wake::Cancelled
        } else {
            Wake::Elapsed
        }
    }
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
    /// Blocks for up to `timeout`. Returns early with `Wake::Cancelled` once `cancel` trips.
    fn wait(&self, timeout: Duration, cancel: &Cancel) -> Wake;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn wait(&self, timeout: Duration, cancel: &Cancel) -> Wake {
        (**self).wait(timeout, cancel)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn wait(&self, timeout: Duration, cancel: &Cancel) -> Wake {
        cancel.wait_timeout(timeout)
    }
}
