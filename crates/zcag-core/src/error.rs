//! 引擎错误定义

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AreaError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown area rules: {0}")]
    UnknownRules(String),

    #[error("Failed to construct area rules '{name}': {reason}")]
    RulesConstruction { name: String, reason: String },

    #[error("Default area rules already resolved")]
    RulesAlreadyResolved,
}

pub type Result<T> = std::result::Result<T, AreaError>;
