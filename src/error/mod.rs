use crate::config::ConfigError;
use crate::replay::ReplayError;
use thiserror::Error;

pub type OxideResult<T> = std::result::Result<T, OxideError>;

#[derive(Debug, Error)]
pub enum OxideError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Replay(#[from] ReplayError),
}
