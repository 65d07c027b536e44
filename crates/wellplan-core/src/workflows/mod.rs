//! # Workflows Module
//!
//! Complete liquid-handling procedures built on the engine. Each workflow validates its
//! request up front, mutates the [`Inventory`](crate::core::models::inventory::Inventory) only
//! once the request is known to be satisfiable, and returns the instructions an external
//! transfer emitter would execute.
//!
//! - **Mastermix** ([`mastermix`]) - Packs a reaction count into destination wells, provisions
//!   each input proportionally and schedules mixes.
//! - **Serial dilution** ([`dilution`]) - Row-wise dilution series with a single tip.

pub mod dilution;
pub mod mastermix;
