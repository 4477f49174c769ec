use bbs_mem::MemoryError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HostError>;

/// Faults raised while servicing a host-function call.
///
/// Every variant is fatal for the calling module: it means the emulated binary
/// uses the host API in a way this host does not support. The execution loop
/// decides whether to stop the module or the whole session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("unknown exported function ordinal {ordinal} in {module}")]
    UnknownOrdinal { module: &'static str, ordinal: u16 },

    #[error("{function}: {detail} is not supported")]
    UnsupportedFeature {
        function: &'static str,
        detail: String,
    },

    #[error("{function}: call parameter {index} is missing")]
    MissingParameter { function: &'static str, index: usize },

    #[error("channel {0} is not open")]
    UnknownChannel(u16),

    #[error(transparent)]
    Memory(#[from] MemoryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("registration number must be exactly 8 ASCII digits, got {0:?}")]
    InvalidRegistrationNumber(String),
}
