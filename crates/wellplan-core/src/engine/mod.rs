//! # Engine Module
//!
//! The allocation and packing logic behind the workflows.
//!
//! - [`guard`] - Per-well volume checks and pipettable-volume derivation
//! - [`allocator`] - Container counts, empty-well discovery and well-slice allocation
//! - [`shape`] - Column-major and rectangular stamp-shape detection
//! - [`packing`] - Distribution of a reaction count across uniformly loaded wells
//! - [`plan`] - Instructions produced for an external transfer emitter
//! - [`config`] - Mastermix request configuration and its builder
//! - [`error`] - The engine error taxonomy
//! - [`utils`] - Well and container queries

pub mod allocator;
pub mod config;
pub mod error;
pub mod guard;
pub mod packing;
pub mod plan;
pub mod shape;
pub mod utils;
