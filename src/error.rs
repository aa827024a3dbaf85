use crate::defines::{DefineError, ErrorKind};
use crate::field::Field;
use crate::header::HeaderError;

/// Reasons the station configuration cannot be handed to the firmware.
///
/// All of them are setup defects: they are reported once at startup and
/// never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("configuration was never customized; copy the example template and fill in real values")]
    MissingConfiguration,
    #[error("MQTT_PORT must be within 1..=65535, got {0}")]
    InvalidPort(i64),
    #[error("{0} is empty or still a placeholder")]
    EmptyCredential(Field),
    #[error("{0} is not set")]
    MissingKey(Field),
    #[error("{field} is longer than {max} bytes")]
    TooLong { field: Field, max: usize },
    #[error("{0} has the wrong value type")]
    TypeMismatch(Field),
    #[error("{0} is defined more than once")]
    Duplicate(Field),
    #[error("line {line}: {kind}")]
    Syntax { line: usize, kind: ErrorKind },
}

impl From<DefineError> for Error {
    fn from(e: DefineError) -> Self {
        Error::Syntax {
            line: e.line,
            kind: e.kind,
        }
    }
}

impl From<HeaderError> for Error {
    fn from(e: HeaderError) -> Self {
        match e {
            HeaderError::Syntax(e) => e.into(),
            HeaderError::Duplicate { field, .. } => Error::Duplicate(field),
        }
    }
}
