// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{ProcrunError, Result};
use crate::exec::{MAX_CHANNEL_CAPACITY, SupervisorConfig};
use crate::types::parse_duration;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = ProcrunError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let supervisor = validate_supervisor(&raw)?;
        Ok(ConfigFile::new_unchecked(supervisor, raw.defaults))
    }
}

fn validate_supervisor(cfg: &RawConfigFile) -> Result<SupervisorConfig> {
    let section = &cfg.supervisor;

    if section.channel_capacity == 0 {
        return Err(ProcrunError::ConfigError(
            "[supervisor].channel_capacity must be >= 1 (got 0)".to_string(),
        ));
    }

    if section.channel_capacity > MAX_CHANNEL_CAPACITY {
        return Err(ProcrunError::ConfigError(format!(
            "[supervisor].channel_capacity must be <= {MAX_CHANNEL_CAPACITY} (got {})",
            section.channel_capacity
        )));
    }

    Ok(SupervisorConfig {
        encoding: section.encoding,
        grace_period: positive_duration("grace_period", &section.grace_period)?,
        drain_timeout: positive_duration("drain_timeout", &section.drain_timeout)?,
        channel_capacity: section.channel_capacity,
    })
}

fn positive_duration(field: &str, value: &str) -> Result<Duration> {
    let dur = parse_duration(value).map_err(|e| {
        ProcrunError::ConfigError(format!("[supervisor].{field} = {value:?}: {e}"))
    })?;
    if dur.is_zero() {
        return Err(ProcrunError::ConfigError(format!(
            "[supervisor].{field} must be greater than zero"
        )));
    }
    Ok(dur)
}
