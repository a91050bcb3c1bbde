//! Holds one relay on for a fixed window, then turns it off
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::*;
use thiserror::Error;

use crate::clock::{Cancel, Clock, SystemClock, Wake};
use crate::config::{self, Config, ConfigError};
use crate::drivers::device::{Board, PinId, Switch};
use crate::drivers::DeviceError;

#[derive(Error, Debug, PartialEq)]
pub enum SwitchError {
    #[error(transparent)]
    Device(#[from] DeviceError),
    #[error("Interrupted with {remaining:?} left on the timer")]
    Interrupted { remaining: Duration },
}

/// How the switch waits out the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStrategy {
    /// One wait for the whole window
    Blocking,
    /// Re-check the wall clock against the deadline every `interval`
    Poll { interval: Duration },
}

/// What happens to a relay that is still on when `run` exits early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptPolicy {
    TurnOff,
    LeaveOn,
}

/// Turns a relay on, waits out `duration`, and turns it off again.
///
/// Precondition: at most one instance per pin. Nothing here stops another
/// process from driving the same line.
#[derive(Debug)]
pub struct TimedSwitch<C = SystemClock> {
    pin: PinId,
    duration: chrono::Duration,
    strategy: WaitStrategy,
    policy: InterruptPolicy,
    clock: C,
    cancel: Cancel,
}

impl TimedSwitch<SystemClock> {
    pub fn new(pin: u8, duration: Duration) -> Result<Self, ConfigError> {
        Ok(TimedSwitch {
            pin: config::validate_pin(pin)?,
            duration: config::validate_duration(duration)?,
            strategy: WaitStrategy::Blocking,
            policy: InterruptPolicy::TurnOff,
            clock: SystemClock,
            cancel: Cancel::new(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(config.pin.0, config.duration)?
            .strategy(config.strategy)
            .on_interrupt(config.on_interrupt))
    }
}

impl<C: Clock> TimedSwitch<C> {
    pub fn strategy(mut self, strategy: WaitStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn on_interrupt(mut self, policy: InterruptPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_cancel(mut self, cancel: Cancel) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_clock<D: Clock>(self, clock: D) -> TimedSwitch<D> {
        TimedSwitch {
            pin: self.pin,
            duration: self.duration,
            strategy: self.strategy,
            policy: self.policy,
            clock,
            cancel: self.cancel,
        }
    }

    /// A handle that stops a running `run` early
    pub fn cancel_handle(&self) -> Cancel {
        self.cancel.clone()
    }

    pub fn pin(&self) -> PinId {
        self.pin
    }

    /// Claims the pin, drives it high until the deadline, then drives it low.
    ///
    /// The deadline is fixed before the relay goes on. If the claim fails the
    /// relay is never touched.
    pub fn run<B: Board>(&self, board: &mut B) -> Result<(), SwitchError> {
        let out = board.claim(self.pin).map_err(|e| {
            error!("Couldn't claim {}: {e}", self.pin);
            e
        })?;
        let mut held = Held {
            out,
            policy: self.policy,
            expired: false,
        };

        if self.cancel.is_cancelled() {
            warn!("Cancelled before the relay was switched on");
            return Err(SwitchError::Interrupted {
                remaining: self.duration.to_std().unwrap_or(Duration::ZERO),
            });
        }

        let deadline = self.clock.now() + self.duration;
        info!(
            "Relay {} on until {}",
            self.pin,
            deadline.format("%Y-%m-%d %H:%M:%S")
        );
        held.out.on()?;

        self.wait_until(deadline)?;
        held.expired = true;

        held.out.off()?;
        info!("Relay {} off", self.pin);
        Ok(())
    }

    fn wait_until(&self, deadline: DateTime<Utc>) -> Result<(), SwitchError> {
        while let Some(remaining) = self.remaining(deadline) {
            let step = match self.strategy {
                WaitStrategy::Blocking => remaining,
                WaitStrategy::Poll { interval } => interval.min(remaining),
            };
            trace!("{remaining:?} left, waiting {step:?}");

            if self.clock.wait(step, &self.cancel) == Wake::Cancelled {
                let remaining = self.remaining(deadline).unwrap_or(Duration::ZERO);
                warn!("Interrupted with {remaining:?} left");
                return Err(SwitchError::Interrupted { remaining });
            }
        }
        Ok(())
    }

    /// Time left before the deadline, or None once it has passed
    fn remaining(&self, deadline: DateTime<Utc>) -> Option<Duration> {
        (deadline - self.clock.now())
            .to_std()
            .ok()
            .filter(|d| !d.is_zero())
    }
}

/// A claimed output. Dropping it while the relay is still on applies the
/// interrupt policy, so every early return and unwind goes through here.
/// Once the window has expired the relay is always turned off.
struct Held<S: Switch> {
    out: S,
    policy: InterruptPolicy,
    expired: bool,
}

impl<S: Switch> Drop for Held<S> {
    fn drop(&mut self) {
        if !self.out.is_on() {
            return;
        }
        if self.expired {
            warn!("Retrying off for relay {}", self.out.pin());
            if let Err(e) = self.out.off() {
                error!("Couldn't turn relay {} off: {e}", self.out.pin());
            }
            return;
        }
        match self.policy {
            InterruptPolicy::TurnOff => {
                warn!("Turning relay {} off on early exit", self.out.pin());
                if let Err(e) = self.out.off() {
                    error!("Couldn't turn relay {} off: {e}", self.out.pin());
                }
            }
            InterruptPolicy::LeaveOn => {
                warn!("Leaving relay {} on", self.out.pin());
            }
        }
    }
}
