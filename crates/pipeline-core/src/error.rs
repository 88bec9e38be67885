//! Error taxonomy for the routing core.
//!
//! Only [`RouteError::Input`] is meant to cross the boundary into callers as
//! a genuine `Err`. `SearchExhausted` and `Arithmetic` are modeled so that
//! internal code can use `?` idiomatically, but the engine facade catches
//! both and degrades to an empty route list / zeroed metric respectively,
//! per the reference behavior.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RouteError {
    /// Malformed coordinates or out-of-range pipe parameters. Never reaches the search.
    #[error("{0}")]
    Input(String),

    /// The iteration cap was reached without getting close enough to the goal.
    #[error("path not found")]
    SearchExhausted,

    /// A derived ratio hit division by zero or another arithmetic degeneracy.
    #[error("arithmetic degeneracy")]
    Arithmetic,
}

pub type Result<T> = std::result::Result<T, RouteError>;
