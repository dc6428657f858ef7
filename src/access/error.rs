use thiserror::Error;

use super::Kind;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GetError {
    #[error("environment variable not set: {0}")]
    NotSet(String),

    #[error("environment variable '{key}' cannot be cast to {kind}")]
    CannotCast { key: String, kind: Kind },

    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    #[error("cannot set field {record}.{field}")]
    CannotSetField {
        record: &'static str,
        field: &'static str,
    },

    #[error("{0}")]
    Deserialize(String),
}

impl serde::de::Error for GetError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        GetError::Deserialize(msg.to_string())
    }

    fn missing_field(field: &'static str) -> Self {
        GetError::NotSet(field.to_string())
    }
}
