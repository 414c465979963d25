use crate::{ErrorCode, GateError};

impl From<std::io::Error> for GateError {
    fn from(err: std::io::Error) -> Self {
        GateError::new(ErrorCode::Internal, err.to_string())
    }
}

impl From<serde_json::Error> for GateError {
    fn from(err: serde_json::Error) -> Self {
        GateError::new(ErrorCode::SerializationFailed, err.to_string())
    }
}

impl From<serde_yaml::Error> for GateError {
    fn from(err: serde_yaml::Error) -> Self {
        GateError::new(ErrorCode::SerializationFailed, err.to_string())
    }
}
