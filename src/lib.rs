pub mod clock;
pub mod config;
pub mod defaults;
pub mod drivers;
pub mod switch;

pub mod prelude {
    pub use crate::clock::{Cancel, Clock, SystemClock};
    pub use crate::config::{Config, ConfigError};
    pub use crate::drivers::device::{Board, PinId, Switch};
    pub use crate::drivers::relay::GpioBoard;
    pub use crate::drivers::sim::SimBoard;
    pub use crate::drivers::DeviceError;
    pub use crate::switch::{InterruptPolicy, SwitchError, TimedSwitch, WaitStrategy};
}
