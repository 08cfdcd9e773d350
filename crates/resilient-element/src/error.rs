// Copyright 2026 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// Error types for resilient-element

use thiserror::Error;

/// Result type alias for resilient-element operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by element handles and the automation layer behind them.
///
/// Only [`Error::StaleElementReference`] is ever recovered from, and only once
/// per call. Every other variant is surfaced exactly as the automation layer
/// produced it.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid argument provided to a constructor or builder
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The referenced DOM node is no longer attached to the document
    ///
    /// Raised by the automation layer when an operation targets an element
    /// reference that was invalidated by a page mutation. A logically
    /// equivalent element may still exist and can be found again.
    #[error("Stale element reference: {0}")]
    StaleElementReference(String),

    /// Element not found by locator
    ///
    /// Includes the locator that was used to find the element.
    #[error("Element not found: locator '{0}'")]
    ElementNotFound(String),

    /// Element exists but cannot receive the requested interaction
    #[error("Element not interactable: {0}")]
    ElementNotInteractable(String),

    /// The automation layer does not support the requested operation
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Timeout waiting for the automation layer
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Error>),
}

impl Error {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        Error::Context(msg.into(), Box::new(self))
    }

    /// Returns true when this error reports a stale element reference.
    ///
    /// Context wrappers are looked through, so a resolver function that
    /// annotates a staleness failure still triggers recovery.
    pub fn is_stale_reference(&self) -> bool {
        match self {
            Error::StaleElementReference(_) => true,
            Error::Context(_, inner) => inner.is_stale_reference(),
            _ => false,
        }
    }
}
