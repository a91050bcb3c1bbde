use log::*;

use crate::drivers::device::{Board, PinId, Switch};
use crate::drivers::{DeviceError, Result};

#[derive(Debug, Default)]
pub struct SimBoard {
    unavailable: Option<String>,
}

impl SimBoard {
    pub fn new() -> Self {
        SimBoard { unavailable: None }
    }

    /// A board whose every claim fails, as if the GPIO peripheral were missing
    pub fn unavailable(reason: &str) -> Self {
        SimBoard {
            unavailable: Some(String::from(reason)),
        }
    }
}

impl Board for SimBoard {
    type Output = SimRelay;

    fn claim(&mut self, pin: PinId) -> Result<SimRelay> {
        if let Some(reason) = &self.unavailable {
            return Err(DeviceError::HardwareUnavailable(reason.clone()));
        }
        warn!("Hardware is not enabled, {pin} is simulated");
        Ok(SimRelay {
            pin,
            on: false,
            writes: 0,
        })
    }
}

#[derive(Debug)]
pub struct SimRelay {
    pin: PinId,
    on: bool,
    writes: usize,
}

impl SimRelay {
    /// How many times the output has been written
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Switch for SimRelay {
    fn pin(&self) -> PinId {
        self.pin
    }

    fn on(&mut self) -> Result<()> {
        info!("[sim] {} high", self.pin);
        self.on = true;
        self.writes += 1;
        Ok(())
    }

    fn off(&mut self) -> Result<()> {
        info!("[sim] {} low", self.pin);
        self.on = false;
        self.writes += 1;
        Ok(())
    }

    fn is_on(&self) -> bool {
        self.on
    }
}
