use thiserror::Error;

/// errors of the configuration, patch and case-file layers; the Newton kernel itself never fails
#[derive(Debug, Error)]
pub enum WallFunctionError {
    #[error("Invalid wall function setting '{name}': {value}")]
    InvalidSetting { name: String, value: String },
    #[error("Patch '{patch}': field '{field}' has {found} faces, expected {expected}")]
    LengthMismatch {
        patch: String,
        field: String,
        expected: usize,
        found: usize,
    },
    #[error("Patch '{patch}': invalid value {value} of '{field}' at face {face}")]
    InvalidFaceData {
        patch: String,
        field: String,
        face: usize,
        value: f64,
    },
    #[error("Invalid thermal property {name} = {value}")]
    InvalidThermalProperty { name: String, value: f64 },
    #[error("Case file '{0}' contains no wall faces")]
    EmptyCase(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}
