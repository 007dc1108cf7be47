//! The module contains the errors the engine can throw.
//!
//! All of them are validation failures on user input, raised before anything
//! is sent to the server:
//!
//! - [`InvalidAmount`] the amount is malformed or not strictly positive.
//! - [`InvalidDate`] the date is not a valid calendar day.
//! - [`InvalidCategory`] the category label is empty.
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidDate`]: EngineError::InvalidDate
//!  [`InvalidCategory`]: EngineError::InvalidCategory
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid category: {0}")]
    InvalidCategory(String),
}
