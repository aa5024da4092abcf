use thiserror::Error;

use crate::encoding::Encoding;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("{encoding} parse error: {message}")]
    Parse { encoding: Encoding, message: String },

    #[error("{encoding} encode error: {message}")]
    Encode { encoding: Encoding, message: String },

    #[error("cannot represent document as {encoding}: {reason}")]
    Unrepresentable { encoding: Encoding, reason: String },
}

impl CodecError {
    pub(crate) fn parse(encoding: Encoding, message: impl ToString) -> Self {
        Self::Parse { encoding, message: message.to_string() }
    }

    pub(crate) fn encode(encoding: Encoding, message: impl ToString) -> Self {
        Self::Encode { encoding, message: message.to_string() }
    }
}

pub type CodecResult<T> = Result<T, CodecError>;
