use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("property path is empty")]
    EmptyPath,
    #[error("property path '{0}' contains an empty segment")]
    EmptySegment(String),
    #[error("binding for '{0}' has an empty column name")]
    EmptyColumn(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
