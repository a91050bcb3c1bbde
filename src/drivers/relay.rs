use log::*;
use rppal::gpio::{Gpio, OutputPin};

use crate::drivers::device::{Board, PinId, Switch};
use crate::drivers::Result;

/// The board's GPIO peripheral. Opening it is deferred until a pin is claimed.
#[derive(Debug, Default)]
pub struct GpioBoard;

impl GpioBoard {
    pub fn new() -> Self {
        GpioBoard
    }
}

impl Board for GpioBoard {
    type Output = Relay;

    fn claim(&mut self, pin: PinId) -> Result<Relay> {
        trace!("Claiming {pin} as an output");
        let mut out = Gpio::new()?.get(pin.0)?.into_output_low();

        // The pin keeps whatever level we last wrote when it's dropped.
        // Turning it off on the way out is the switch guard's job.
        out.set_reset_on_drop(false);

        Ok(Relay { pin, out })
    }
}

#[derive(Debug)]
pub struct Relay {
    pin: PinId,
    out: OutputPin,
}

impl Switch for Relay {
    fn pin(&self) -> PinId {
        self.pin
    }

    fn on(&mut self) -> Result<()> {
        trace!("Setting relay pin {} high", self.pin);
        self.out.set_high();
        Ok(())
    }

    fn off(&mut self) -> Result<()> {
        trace!("Setting relay pin {} low", self.pin);
        self.out.set_low();
        Ok(())
    }

    fn is_on(&self) -> bool {
        self.out.is_set_high()
    }
}
