//! Civ Settlements - settlement footprints on a triangular tile world
//!
//! Settlements grow over a band of alternating up/down triangles that wraps
//! around a cylinder. This crate computes which tiles each settlement covers,
//! traces the outline of those tiles for border rendering, and drives size
//! promotion and housing from explicit turn entry points.

pub mod core;
pub mod settlement;
pub mod simulation;
pub mod spatial;
pub mod world;
