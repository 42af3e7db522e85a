//! Domain-specific errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown trigger '{0}'")]
    UnknownTrigger(String),
    #[error("'{0}' is an internal trigger and cannot be raised by a page")]
    SyntheticTrigger(String),
}
