//! Domain error types.

/// Top-level error type for simtrader.
///
/// Trades that fire but cannot be executed (not enough cash, nothing to sell)
/// are not errors; the ledger reports them as outcomes instead.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("invalid argument {name}: {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("invalid state: {reason}")]
    InvalidState { reason: String },

    #[error("cannot {operation} while the simulation is running")]
    Busy { operation: String },

    #[error("unknown instrument {id}")]
    UnknownInstrument { id: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SimError {
    pub fn invalid_argument(name: &str, reason: impl Into<String>) -> Self {
        SimError::InvalidArgument {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_state(reason: impl Into<String>) -> Self {
        SimError::InvalidState {
            reason: reason.into(),
        }
    }
}

impl From<&SimError> for std::process::ExitCode {
    fn from(err: &SimError) -> Self {
        let code: u8 = match err {
            SimError::Io(_) | SimError::Report { .. } => 1,
            SimError::ConfigParse { .. }
            | SimError::ConfigMissing { .. }
            | SimError::ConfigInvalid { .. } => 2,
            SimError::InvalidArgument { .. } => 3,
            SimError::InvalidState { .. }
            | SimError::Busy { .. }
            | SimError::UnknownInstrument { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
