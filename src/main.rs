use std::process::ExitCode;

use log::*;
use thiserror::Error;

use relaytimer::defaults;
use relaytimer::prelude::*;

#[derive(Error, Debug)]
enum Failure {
    #[error("Bad configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Switch(#[from] SwitchError),
}

/// 0 done, 1 device failure, 2 bad configuration, 130 interrupted
fn exit_code(res: &Result<(), Failure>) -> u8 {
    match res {
        Ok(()) => 0,
        Err(Failure::Config(_)) => 2,
        Err(Failure::Switch(SwitchError::Interrupted { .. })) => 130,
        Err(Failure::Switch(SwitchError::Device(_))) => 1,
    }
}

fn start() -> Result<(), Failure> {
    let config = Config::load()?;
    let switch = TimedSwitch::from_config(&config)?;

    // SIGINT, SIGTERM and SIGHUP all end the wait early
    let cancel = switch.cancel_handle();
    if let Err(e) = ctrlc::set_handler(move || cancel.cancel()) {
        warn!("Failed to install signal handler: {}", e);
    }

    info!(
        "Holding relay {} on for {:?} ({:?})",
        config.pin, config.duration, config.strategy
    );

    if config.hardware {
        switch.run(&mut GpioBoard::new())?;
    } else {
        switch.run(&mut SimBoard::new())?;
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::new()
        .parse_filters(&defaults::log_filter())
        .init();

    let res = start();
    match &res {
        Ok(()) => {}
        Err(e @ Failure::Switch(SwitchError::Interrupted { .. })) => warn!("{e}"),
        Err(e) => error!("{e}"),
    }
    ExitCode::from(exit_code(&res))
}
