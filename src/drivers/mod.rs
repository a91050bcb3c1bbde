use thiserror::Error;

pub mod device;
pub mod relay;
pub mod sim;

#[derive(Error, Debug, PartialEq)]
pub enum DeviceError {
    #[error("GPIO hardware unavailable: {0}")]
    HardwareUnavailable(String),
    /// A write to an already claimed output failed
    #[error("Communication error: {0}")]
    CommunicationError(String),
}

impl From<rppal::gpio::Error> for DeviceError {
    fn from(e: rppal::gpio::Error) -> Self {
        DeviceError::HardwareUnavailable(format!("{e}"))
    }
}

/// A custom error type using the DeviceError defined above
pub type Result<T> = std::result::Result<T, DeviceError>;

/// Whether RELAY_HARDWARE asks for real GPIO. Anything but an explicit "no" does.
pub(crate) fn hardware_enabled_from(value: Option<&str>) -> bool {
    !matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("0") | Some("false") | Some("off") | Some("no")
    )
}
