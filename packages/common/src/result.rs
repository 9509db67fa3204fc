use crate::error::GenerateError;

/// Common Result type alias
pub type GenerateResult<T> = Result<T, GenerateError>;
