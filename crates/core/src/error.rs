use crate::validation::ValidationFailure;

#[derive(Debug, thiserror::Error)]
pub enum DiversityError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("malformed request body: {0}")]
    MalformedRequest(serde_json::Error),

    #[error("customer {0} does not exist")]
    CustomerNotFound(String),
    #[error("customer {0} is read only")]
    CustomerReadOnly(String),
    #[error("a diversity record already exists for customer {0}")]
    AlreadyExists(String),
    #[error("diversity record {0} not found")]
    NotFound(String),

    #[error("validation failed with {} failure(s)", .0.len())]
    Validation(Vec<ValidationFailure>),
    #[error("unable to merge patch into diversity record {0}")]
    MergeFailed(String),

    #[error("store error: {0}")]
    Store(String),
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to write record file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read record file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to serialize diversity record: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize diversity record: {0}")]
    Deserialization(serde_json::Error),

    #[error("invalid identifier: {0}")]
    Identifier(#[from] diversity_uuid::UuidError),
    #[error("invalid text: {0}")]
    Text(#[from] diversity_types::TextError),

    #[error("failed to publish event: {0}")]
    Publish(String),
}

pub type DiversityResult<T> = std::result::Result<T, DiversityError>;
