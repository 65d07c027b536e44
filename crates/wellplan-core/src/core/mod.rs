//! # Core Module
//!
//! Fundamental building blocks shared by the allocation engine and the workflows.
//!
//! - **Labware** ([`labware`]) - Container-type descriptors and the registry that serves them
//! - **Models** ([`models`]) - Containers, wells, well references and the owning inventory
//! - **Units** ([`units`]) - Volume quantities and resource identifiers
//! - **Volume model** ([`volume`]) - Usable-volume arithmetic under dead/safe-volume policies

pub mod labware;
pub mod models;
pub mod units;
pub mod volume;
