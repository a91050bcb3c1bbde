use std::thread::sleep;
use std::time::Duration;

use log::*;
use relaytimer::prelude::*;

fn main() -> Result<(), DeviceError> {
    env_logger::init();

    info!("Starting relay test");

    let mut relay = GpioBoard::new().claim(PinId(relaytimer::defaults::relay_pin()))?;

    for _ in 0..3 {
        relay.on()?;
        info!("Relay is on? {}", relay.is_on());
        sleep(Duration::from_secs(1));
        relay.off()?;
        info!("Relay is on? {}", relay.is_on());
        sleep(Duration::from_secs(1));
    }

    Ok(())
}
