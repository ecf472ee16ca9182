use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Duplicate {kind} identifier: {id}")]
    DuplicateIdentifier { kind: &'static str, id: String },

    #[error("Unknown {kind} reference '{id}' in {referrer}")]
    UnknownReference {
        kind: &'static str,
        id: String,
        referrer: String,
    },

    #[error("Flow '{flow}' has identical source and destination '{element}'")]
    SelfLoopFlow { flow: String, element: String },

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
