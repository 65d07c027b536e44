//! # wellplan Core Library
//!
//! Volume-aware well allocation and mastermix packing for programmatically described
//! liquid-handling protocols.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture with a clear separation of concerns.
//!
//! - **[`core`]: The Foundation.** Plain data models (`Inventory`, `Container`, `Well`),
//!   the container-type registry, volume quantities and the usable-volume arithmetic.
//!
//! - **[`engine`]: The Logic Core.** Per-well volume guards, the container allocator, the
//!   stamp-shape detector, reaction packing and the instruction types handed to a transfer
//!   emitter.
//!
//! - **[`workflows`]: The Public API.** Complete procedures such as mastermix creation and
//!   row-wise serial dilution, tying `engine` and `core` together.
//!
//! Every operation is synchronous and deterministic. An [`core::models::inventory::Inventory`]
//! is only ever mutated through `&mut`, and allocating calls return an
//! [`engine::allocator::AllocationCursor`] that callers thread into the next call that targets
//! the same physical container.

pub mod core;
pub mod engine;
pub mod workflows;
