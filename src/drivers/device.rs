use std::fmt;

use crate::drivers::Result;

/// A BCM GPIO number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinId(pub u8);

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{}", self.0)
    }
}

/// A single binary output, which every relay driver implements
pub trait Switch {
    fn pin(&self) -> PinId;
    /// Drives the output high
    fn on(&mut self) -> Result<()>;
    /// Drives the output low
    fn off(&mut self) -> Result<()>;
    /// The last state written to the output
    fn is_on(&self) -> bool;
}

/// Something that hands out outputs by pin number
pub trait Board {
    type Output: Switch;
    /// Claims the pin as an output, initially low
    fn claim(&mut self, pin: PinId) -> Result<Self::Output>;
}
