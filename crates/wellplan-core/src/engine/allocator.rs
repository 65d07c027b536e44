use super::error::{ConfigurationError, EngineError, StateError, ValidationError};
use crate::core::labware::registry::ContainerTypeRegistry;
use crate::core::models::container_type::ContainerTypeSpec;
use crate::core::models::ids::{ContainerId, WellRef};
use crate::core::models::inventory::{Inventory, InventoryError};
use crate::core::models::selection::{WellCollection, WellGroup};
use serde::Serialize;
use tracing::{debug, info};

/// Smallest `n` such that `n * capacity >= total`.
///
/// Quotients within floating-point noise of an integer are treated as that integer, so
/// `plates_needed(1.1, 0.1)` is 11 rather than 12.
pub fn plates_needed(total: f64, capacity: f64) -> Result<usize, ValidationError> {
    if !capacity.is_finite() || capacity <= 0.0 {
        return Err(ValidationError::NonPositiveCapacity(capacity));
    }
    if total <= 0.0 {
        return Ok(0);
    }
    let quotient = total / capacity;
    let nearest = quotient.round();
    let needed = if (quotient - nearest).abs() < 1e-9 {
        nearest
    } else {
        quotient.ceil()
    };
    Ok(needed as usize)
}

/// First well without a recorded volume, scanning in container then index order.
///
/// `Ok(None)` is a normal answer meaning every well already holds liquid.
pub fn first_empty_well<T: WellCollection + ?Sized>(
    inventory: &Inventory,
    wells: &T,
) -> Result<Option<WellRef>, EngineError> {
    let mut refs = wells.well_refs(inventory)?;
    refs.sort();
    for well in refs {
        if inventory.well(well)?.is_empty() {
            return Ok(Some(well));
        }
    }
    Ok(None)
}

/// Where the next allocation into a container may start.
///
/// Every allocating call returns a cursor; a caller that keeps filling the same physical
/// container passes it back as [`Destination::Resume`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AllocationCursor {
    pub container: ContainerId,
    /// Position in the fill order (row-major or column-major) of the next free well.
    pub next_position: usize,
    pub columnwise: bool,
}

impl AllocationCursor {
    /// The well the next allocation would start at, if the container still has room.
    pub fn next_well(&self, inventory: &Inventory) -> Option<WellRef> {
        let spec = inventory.container(self.container)?.container_type();
        (self.next_position < spec.well_count).then(|| {
            WellRef::new(
                self.container,
                spec.index_at_fill_position(self.next_position, self.columnwise),
            )
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Destination {
    /// Create fresh containers of the named type.
    NewContainers(String),
    /// Fill an existing container, from `start_well` or from its first empty well.
    Existing {
        container: ContainerId,
        start_well: Option<usize>,
    },
    /// Continue where a previous allocation left off.
    Resume(AllocationCursor),
}

/// A validated destination. Resolving one never mutates the inventory.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationTarget {
    pub container_type: ContainerTypeSpec,
    /// Existing container and the fill position to start at.
    pub existing: Option<(ContainerId, usize)>,
    pub columnwise: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub wells: WellGroup,
    pub created_containers: Vec<ContainerId>,
    pub cursor: AllocationCursor,
}

fn first_empty_position(
    inventory: &Inventory,
    container: ContainerId,
    columnwise: bool,
) -> Result<Option<usize>, InventoryError> {
    let container = inventory.get_container(container)?;
    let spec = container.container_type();
    Ok((0..spec.well_count).find(|&position| {
        container
            .well(spec.index_at_fill_position(position, columnwise))
            .is_some_and(|w| w.is_empty())
    }))
}

/// Turns a [`Destination`] into an [`AllocationTarget`].
///
/// A resumed cursor keeps its own fill order; `columnwise` applies to the other variants.
pub fn resolve_destination(
    inventory: &Inventory,
    registry: &ContainerTypeRegistry,
    destination: &Destination,
    columnwise: bool,
) -> Result<AllocationTarget, EngineError> {
    match destination {
        Destination::NewContainers(type_name) => {
            let spec = registry
                .get(type_name)
                .ok_or_else(|| ConfigurationError::UnknownContainerType(type_name.clone()))?;
            Ok(AllocationTarget {
                container_type: spec.clone(),
                existing: None,
                columnwise,
            })
        }
        Destination::Existing {
            container,
            start_well,
        } => {
            let spec = inventory.get_container(*container)?.container_type().clone();
            let start = match start_well {
                Some(index) => {
                    inventory.well(WellRef::new(*container, *index))?;
                    Some(spec.fill_position(*index, columnwise))
                }
                None => first_empty_position(inventory, *container, columnwise)?,
            };
            if start.is_none() {
                debug!(
                    "Container {:?} has no empty well left; a new container will be used",
                    container
                );
            }
            Ok(AllocationTarget {
                existing: start.map(|position| (*container, position)),
                container_type: spec,
                columnwise,
            })
        }
        Destination::Resume(cursor) => {
            let spec = inventory
                .get_container(cursor.container)?
                .container_type()
                .clone();
            let existing =
                (cursor.next_position < spec.well_count).then_some((cursor.container, cursor.next_position));
            Ok(AllocationTarget {
                container_type: spec,
                existing,
                columnwise: cursor.columnwise,
            })
        }
    }
}

fn ensure_empty(inventory: &Inventory, wells: &WellGroup) -> Result<(), EngineError> {
    for well in wells {
        if !inventory.well(*well)?.is_empty() {
            let container = inventory.get_container(well.container)?;
            return Err(StateError::NotEmpty {
                container: container.name.clone(),
                index: well.index,
            }
            .into());
        }
    }
    Ok(())
}

fn claim(inventory: &mut Inventory, wells: &WellGroup, name: &str) -> Result<(), EngineError> {
    ensure_empty(inventory, wells)?;
    for well in wells {
        inventory.set_name(*well, name)?;
    }
    Ok(())
}

/// Claims `wells_needed` empty wells for `name`.
///
/// An existing container is only used when all requested wells fit after its start
/// position; otherwise fresh containers of the same type are created, each filled to
/// capacity except the last.
///
/// # Errors
///
/// Fails with [`StateError::NotEmpty`] if a selected well already holds liquid. Containers
/// created before a failure are not removed.
pub fn allocate(
    inventory: &mut Inventory,
    target: &AllocationTarget,
    wells_needed: usize,
    name: &str,
) -> Result<Allocation, EngineError> {
    if wells_needed == 0 {
        return Err(ValidationError::EmptySelection("allocate").into());
    }
    let spec = &target.container_type;
    let columnwise = target.columnwise;

    if let Some((container, start)) = target.existing {
        let free = spec.well_count.saturating_sub(start);
        if free >= wells_needed {
            let start_index = spec.index_at_fill_position(start, columnwise);
            let wells = inventory.wells_from(container, start_index, wells_needed, columnwise)?;
            claim(inventory, &wells, name)?;
            debug!(
                "Claimed {} well(s) in existing container {:?} from position {}",
                wells_needed, container, start
            );
            return Ok(Allocation {
                wells,
                created_containers: Vec::new(),
                cursor: AllocationCursor {
                    container,
                    next_position: start + wells_needed,
                    columnwise,
                },
            });
        }
        info!(
            "Existing container has {} free well(s) but {} are needed; starting a new '{}' container",
            free, wells_needed, spec.shortname
        );
    }

    let containers_needed = plates_needed(wells_needed as f64, spec.well_count as f64)?;
    let mut wells = WellGroup::default();
    let mut created_containers = Vec::with_capacity(containers_needed);
    let mut remaining = wells_needed;
    let mut cursor = None;

    for _ in 0..containers_needed {
        let container_name = inventory.next_free_name(name);
        let container = inventory.add_container(&container_name, spec);
        let count = remaining.min(spec.well_count);
        let slice = inventory.wells_from(container, 0, count, columnwise)?;
        claim(inventory, &slice, name)?;
        wells.extend(slice);
        created_containers.push(container);
        remaining -= count;
        cursor = Some(AllocationCursor {
            container,
            next_position: count,
            columnwise,
        });
    }
    info!(
        "Created {} '{}' container(s) for {} well(s)",
        created_containers.len(),
        spec.shortname,
        wells_needed
    );

    let cursor = cursor.ok_or(ValidationError::EmptySelection("allocate"))?;
    Ok(Allocation {
        wells,
        created_containers,
        cursor,
    })
}
