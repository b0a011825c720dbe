use std::error;
use std::fmt;

#[derive(Debug)]
pub enum DecodeError {
    Malformed(serde_json::Error),
    NotAnObject,
    MissingField(&'static str),
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },
    InvalidTimestamp(std::string::String),
    NonexistentLocalTime(std::string::String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecodeError::Malformed(err) => write!(f, "Malformed snapshot: {}", err),
            DecodeError::NotAnObject => write!(f, "Snapshot is not an object"),
            DecodeError::MissingField(field) => write!(f, "Missing field: {}", field),
            DecodeError::InvalidType { field, expected } => {
                write!(f, "Invalid value for {}, expected {}", field, expected)
            }
            DecodeError::InvalidTimestamp(raw) => write!(f, "Invalid timestamp: {:?}", raw),
            DecodeError::NonexistentLocalTime(raw) => {
                write!(f, "Local time does not exist in source zone: {}", raw)
            }
        }
    }
}

impl error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            DecodeError::Malformed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::Malformed(err)
    }
}
