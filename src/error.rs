use thiserror::Error;

/// Errors raised by the response store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read response store {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write response store {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Response store {path} is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised by the call session controller
#[derive(Error, Debug)]
pub enum CallError {
    #[error("No phone number selected")]
    NoSelection,

    #[error("Index {index} is out of range (list has {len} numbers)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("A call is already being dialed")]
    AlreadyDialing,

    #[error("Operation not allowed while the call is {0}")]
    InvalidState(&'static str),

    #[error("No call is connected")]
    NotConnected,

    #[error("Voice transport failed to connect: {0}")]
    Connect(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
