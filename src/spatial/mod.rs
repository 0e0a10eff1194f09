//! Spatial checks over settlement geometry

pub mod validation;

pub use validation::{BorderValidator, ValidationError, Winding};
