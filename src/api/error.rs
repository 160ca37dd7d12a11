use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("{flag} must be {requirement}")]
    OutOfRange {
        flag: &'static str,
        requirement: &'static str,
    },
    #[error("{flag} has an invalid entry: {value}")]
    InvalidList { flag: &'static str, value: String },
    #[error("failed to serialize report: {0}")]
    Serialize(String),
}

impl ApiError {
    pub(crate) fn out_of_range(flag: &'static str, requirement: &'static str) -> Self {
        Self::OutOfRange { flag, requirement }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value.to_string())
    }
}
