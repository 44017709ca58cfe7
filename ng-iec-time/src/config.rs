use crate::{
    error::{Error, Result},
    frame::cp24::{DEFAULT_ROLLBACK_TOLERANCE_MINS, MAX_ROLLBACK_TOLERANCE_MINS},
};
use chrono::FixedOffset;
use config::{Config, Environment, File, Map, Source};
use serde::Deserialize;

/// Prefix of environment overrides, e.g. `IEC_TIME__UTC_OFFSET_SECS=28800`.
pub const ENV_PREFIX: &str = "IEC_TIME";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimeCodecConfig {
    /// Offset of the zone time tags are exchanged in, seconds east of UTC.
    ///
    /// Defaults to 0. IEC 60870-5-104 recommends UTC on the wire; set this only
    /// for peers configured with local time.
    #[serde(default)]
    pub utc_offset_secs: i32,
    /// Minutes a CP24Time2a tag may run ahead of the reference clock before it
    /// is assigned to the previous hour. At most 59.
    #[serde(default = "TimeCodecConfig::rollback_tolerance_mins_default")]
    pub rollback_tolerance_mins: u32,
}

impl Default for TimeCodecConfig {
    fn default() -> Self {
        Self {
            utc_offset_secs: 0,
            rollback_tolerance_mins: Self::rollback_tolerance_mins_default(),
        }
    }
}

impl TimeCodecConfig {
    fn rollback_tolerance_mins_default() -> u32 {
        DEFAULT_ROLLBACK_TOLERANCE_MINS
    }

    /// Loads the config from an optional file at `path` (any format the
    /// `config` crate recognises by extension) overlaid with `IEC_TIME__*`
    /// environment variables.
    pub fn load(path: &str) -> Result<Self> {
        Self::build(File::with_name(path).required(false), None)
    }

    fn build<S>(file: S, env: Option<Map<String, String>>) -> Result<Self>
    where
        S: Source + Send + Sync + 'static,
    {
        let config = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;
        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the offset and a rollback tolerance below one hour.
    pub fn validate(&self) -> Result<()> {
        self.zone()?;
        if self.rollback_tolerance_mins > MAX_ROLLBACK_TOLERANCE_MINS {
            return Err(Error::InvalidTolerance(self.rollback_tolerance_mins));
        }
        Ok(())
    }

    /// The configured zone, rejecting offsets of a day or more.
    pub fn zone(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_secs)
            .ok_or(Error::InvalidOffset(self.utc_offset_secs))
    }
}
