//! Geometry validation for traced settlement outlines

mod geometric;

pub use geometric::BorderValidator;

/// Validation error types
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    InsufficientVertices { count: usize, minimum: usize },
    DuplicateVertex { index: usize },
    SelfIntersecting { description: String },
    InvalidWinding { expected: Winding },
    NotContained { outer: String, inner: String },
    PolygonOverlap { area1: String, area2: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    CounterClockwise,
    Clockwise,
}
