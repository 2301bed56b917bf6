//! Domain error types.

/// Top-level error type for stockadvisor.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("data error: {reason}")]
    Data { reason: String },

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

    #[error("invalid period {input:?}: {reason}")]
    PeriodInvalid { input: String, reason: String },

    #[error("no data for {ticker}")]
    NoData { ticker: String },

    #[error("insufficient data for {ticker}: have {bars} bars, need {minimum}")]
    InsufficientData {
        ticker: String,
        bars: usize,
        minimum: usize,
    },

    #[error("malformed snapshot: {field} is {value}")]
    MalformedSnapshot { field: String, value: f64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&AdvisorError> for std::process::ExitCode {
    fn from(err: &AdvisorError) -> Self {
        let code: u8 = match err {
            AdvisorError::Io(_) => 1,
            AdvisorError::ConfigParse { .. }
            | AdvisorError::ConfigMissing { .. }
            | AdvisorError::ConfigInvalid { .. } => 2,
            AdvisorError::Data { .. } => 3,
            AdvisorError::PeriodInvalid { .. } => 4,
            AdvisorError::NoData { .. } | AdvisorError::InsufficientData { .. } => 5,
            AdvisorError::MalformedSnapshot { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
