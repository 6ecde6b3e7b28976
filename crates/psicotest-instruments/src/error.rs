use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstrumentError {
    #[error("unclassified score {score}: no severity band contains it (max {max_score})")]
    UnclassifiedScore { score: u32, max_score: u32 },

    #[error("invalid severity bands: {0}")]
    InvalidBands(String),
}

#[derive(Debug, Error)]
pub enum InterpretError {
    #[error(transparent)]
    Instrument(#[from] InstrumentError),

    #[error("language model call failed: {0}")]
    Invocation(String),

    #[error("language model response could not be parsed: {0}")]
    ResponseParse(String),
}
