use config::ConfigError;
use std::result::Result as StdResult;
use thiserror::Error;

pub type Result<T> = StdResult<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{tag}: need {need} octets, got {got}")]
    Truncated {
        tag: &'static str,
        need: usize,
        got: usize,
    },

    #[error("{tag}: calendar fields out of range")]
    OutOfRange { tag: &'static str },

    #[error("utc offset out of range: {0}s")]
    InvalidOffset(i32),

    #[error("rollback tolerance out of range: {0} min")]
    InvalidTolerance(u32),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}
