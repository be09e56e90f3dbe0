use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NwError {
    #[error("bad parameter: {msg}")]
    BadParameter { msg: String },

    #[error("invalid character '{ch}' in sequence {seq} at position {pos}")]
    InvalidSequence { seq: u8, ch: char, pos: usize },

    #[error("alignment matrix of {cells} cells exceeds the limit of {limit} cells")]
    ResourceLimit { cells: u128, limit: usize },

    #[error("alignment score {score} does not fit a 32-bit score")]
    ScoreOverflow { score: i64 },

    #[error("alignment has not been run")]
    NotRun,

    #[error("invalid transcript symbol '{ch}' at position {pos}")]
    InvalidTranscript { ch: char, pos: usize },

    #[error("transcript does not fit the sequences: {msg}")]
    TranscriptMismatch { msg: String },
}

impl NwError {
    pub(crate) fn bad_parameter(msg: impl Into<String>) -> Self {
        NwError::BadParameter { msg: msg.into() }
    }
}

pub type NwResult<T> = Result<T, NwError>;
