use std::env::var;
use std::time::Duration;

use log::*;
use thiserror::Error;

use crate::defaults;
use crate::drivers::device::PinId;
use crate::drivers::hardware_enabled_from;
use crate::switch::{InterruptPolicy, WaitStrategy};

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("GPIO{0} is not on the 40-pin header (BCM 0..={})", defaults::MAX_HEADER_PIN)]
    InvalidPin(u8),
    #[error("{key} has an invalid value `{value}`")]
    Parse { key: &'static str, value: String },
    #[error("RELAY_POLL_MS must be greater than zero")]
    ZeroPollInterval,
    #[error("A duration of {0:?} is too long to schedule")]
    DurationOutOfRange(Duration),
}

/// Everything the relay timer can be told from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub pin: PinId,
    pub duration: Duration,
    pub strategy: WaitStrategy,
    pub on_interrupt: InterruptPolicy,
    pub hardware: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            pin: PinId(defaults::relay_pin()),
            duration: defaults::duration(),
            strategy: WaitStrategy::Blocking,
            on_interrupt: InterruptPolicy::TurnOff,
            hardware: true,
        }
    }
}

impl Config {
    /// Reads the RELAY_* environment variables, falling back to the defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pin = match lookup("RELAY_PIN") {
            Some(v) => parse("RELAY_PIN", &v)?,
            None => defaults::relay_pin(),
        };
        let pin = validate_pin(pin)?;

        let duration = match lookup("RELAY_DURATION_SECS") {
            Some(v) => Duration::from_secs(parse("RELAY_DURATION_SECS", &v)?),
            None => defaults::duration(),
        };
        validate_duration(duration)?;

        let strategy = match choice(&lookup, "RELAY_WAIT").as_deref() {
            None | Some("blocking") | Some("sleep") => WaitStrategy::Blocking,
            Some("poll") | Some("loop") => {
                let interval = match lookup("RELAY_POLL_MS") {
                    Some(v) => Duration::from_millis(parse("RELAY_POLL_MS", &v)?),
                    None => defaults::poll_interval(),
                };
                if interval.is_zero() {
                    return Err(ConfigError::ZeroPollInterval);
                }
                WaitStrategy::Poll { interval }
            }
            Some(other) => {
                return Err(ConfigError::Parse {
                    key: "RELAY_WAIT",
                    value: String::from(other),
                })
            }
        };

        let on_interrupt = match choice(&lookup, "RELAY_ON_INTERRUPT").as_deref() {
            None | Some("off") => InterruptPolicy::TurnOff,
            Some("leave") | Some("on") => InterruptPolicy::LeaveOn,
            Some(other) => {
                return Err(ConfigError::Parse {
                    key: "RELAY_ON_INTERRUPT",
                    value: String::from(other),
                })
            }
        };

        let hardware = hardware_enabled_from(lookup("RELAY_HARDWARE").as_deref());

        let config = Config {
            pin,
            duration,
            strategy,
            on_interrupt,
            hardware,
        };
        debug!("Loaded config: {config:?}");
        Ok(config)
    }
}

/// A keyword setting, trimmed and lowercased
fn choice<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map(|v| v.trim().to_ascii_lowercase())
}

fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Parse {
        key,
        value: String::from(value),
    })
}

pub fn validate_pin(pin: u8) -> Result<PinId, ConfigError> {
    if pin > defaults::MAX_HEADER_PIN {
        return Err(ConfigError::InvalidPin(pin));
    }
    Ok(PinId(pin))
}

/// A duration has to fit in the wall-clock arithmetic used for the deadline
pub fn validate_duration(duration: Duration) -> Result<chrono::Duration, ConfigError> {
    chrono::Duration::from_std(duration)
        .ok()
        // Keep clear of the DateTime range so `now + duration` can't overflow
        .filter(|d| *d <= chrono::Duration::days(365 * 100))
        .ok_or(ConfigError::DurationOutOfRange(duration))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.pin, PinId(23));
        assert_eq!(config.duration, Duration::from_secs(18_000));
        assert_eq!(config.strategy, WaitStrategy::Blocking);
        assert_eq!(config.on_interrupt, InterruptPolicy::TurnOff);
        assert!(config.hardware);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("RELAY_PIN", "17"),
            ("RELAY_DURATION_SECS", " 90 "),
            ("RELAY_WAIT", "poll"),
            ("RELAY_POLL_MS", "250"),
            ("RELAY_ON_INTERRUPT", "leave"),
            ("RELAY_HARDWARE", "0"),
        ])
        .unwrap();
        assert_eq!(config.pin, PinId(17));
        assert_eq!(config.duration, Duration::from_secs(90));
        assert_eq!(
            config.strategy,
            WaitStrategy::Poll {
                interval: Duration::from_millis(250)
            }
        );
        assert_eq!(config.on_interrupt, InterruptPolicy::LeaveOn);
        assert!(!config.hardware);
    }

    #[test]
    fn test_poll_uses_default_interval() {
        let config = load(&[("RELAY_WAIT", "poll")]).unwrap();
        assert_eq!(
            config.strategy,
            WaitStrategy::Poll {
                interval: Duration::from_secs(1)
            }
        );
    }

    #[test]
    fn test_zero_duration_is_valid() {
        let config = load(&[("RELAY_DURATION_SECS", "0")]).unwrap();
        assert_eq!(config.duration, Duration::ZERO);
    }

    #[test]
    fn test_invalid_pin() {
        assert_eq!(load(&[("RELAY_PIN", "28")]), Err(ConfigError::InvalidPin(28)));
        assert!(load(&[("RELAY_PIN", "27")]).is_ok());
        assert!(load(&[("RELAY_PIN", "0")]).is_ok());
    }

    #[test]
    fn test_unparseable_values() {
        assert_eq!(
            load(&[("RELAY_DURATION_SECS", "-5")]),
            Err(ConfigError::Parse {
                key: "RELAY_DURATION_SECS",
                value: String::from("-5")
            })
        );
        assert!(matches!(
            load(&[("RELAY_PIN", "300")]),
            Err(ConfigError::Parse { key: "RELAY_PIN", .. })
        ));
        assert!(matches!(
            load(&[("RELAY_WAIT", "spin")]),
            Err(ConfigError::Parse { key: "RELAY_WAIT", .. })
        ));
        assert!(matches!(
            load(&[("RELAY_ON_INTERRUPT", "maybe")]),
            Err(ConfigError::Parse { key: "RELAY_ON_INTERRUPT", .. })
        ));
    }

    #[test]
    fn test_zero_poll_interval() {
        assert_eq!(
            load(&[("RELAY_WAIT", "poll"), ("RELAY_POLL_MS", "0")]),
            Err(ConfigError::ZeroPollInterval)
        );
        // Irrelevant when blocking
        assert!(load(&[("RELAY_POLL_MS", "0")]).is_ok());
    }

    #[test]
    fn test_poll_interval_ignored_when_blocking() {
        let config = load(&[("RELAY_WAIT", "blocking"), ("RELAY_POLL_MS", "abc")]).unwrap();
        assert_eq!(config.strategy, WaitStrategy::Blocking);
        assert!(matches!(
            load(&[("RELAY_WAIT", "poll"), ("RELAY_POLL_MS", "abc")]),
            Err(ConfigError::Parse { key: "RELAY_POLL_MS", .. })
        ));
    }

    #[test]
    fn test_keywords_ignore_case() {
        let config = load(&[("RELAY_WAIT", " POLL "), ("RELAY_ON_INTERRUPT", "Leave")]).unwrap();
        assert_eq!(
            config.strategy,
            WaitStrategy::Poll {
                interval: Duration::from_secs(1)
            }
        );
        assert_eq!(config.on_interrupt, InterruptPolicy::LeaveOn);
        assert_eq!(
            load(&[("RELAY_WAIT", "Blocking")]).unwrap().strategy,
            WaitStrategy::Blocking
        );
    }

    #[test]
    fn test_duration_out_of_range() {
        let huge = Duration::from_secs(u64::MAX);
        assert_eq!(
            validate_duration(huge),
            Err(ConfigError::DurationOutOfRange(huge))
        );
        assert_eq!(
            validate_duration(Duration::from_secs(18_000)),
            Ok(chrono::Duration::seconds(18_000))
        );
    }
}
