//! # Core Models Module
//!
//! Data structures describing the physical labware a protocol works with.
//!
//! - [`container_type`] - Immutable per-type constants (well count, volumes, grid width)
//! - [`container`] - A container instance and the wells it exclusively owns
//! - [`well`] - A single well with its recorded volume and optional label
//! - [`ids`] - Stable identifiers for containers and wells
//! - [`inventory`] - Arena owning every container created during a protocol session
//! - [`selection`] - Well groups and the `WellLike` capability shared by wells, groups and containers
//!
//! ```ignore
//! use wellplan::core::labware::registry::ContainerTypeRegistry;
//! use wellplan::core::models::inventory::Inventory;
//!
//! let registry = ContainerTypeRegistry::builtin();
//! let mut inventory = Inventory::new();
//! let plate = inventory.add_container("reagents", registry.get("96-pcr").unwrap());
//! inventory.set_volume(WellRef::new(plate, 0), 20.0)?;
//! ```

pub mod container;
pub mod container_type;
pub mod ids;
pub mod inventory;
pub mod selection;
pub mod well;
