use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutlineError {
    #[error("line {line}: invalid {field} '{value}'")]
    InvalidField {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error(transparent)]
    Pattern(#[from] regex::Error),
}

pub type Result<T, E = OutlineError> = std::result::Result<T, E>;
