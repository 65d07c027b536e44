use crate::core::models::ids::{ContainerId, WellRef};
use crate::core::models::inventory::{Inventory, InventoryError};
use crate::core::models::selection::{WellCollection, WellGroup};

/// Wells of a collection that hold a recorded volume, or the empty ones when `empty` is set.
pub fn list_of_filled_wells<T: WellCollection + ?Sized>(
    inventory: &Inventory,
    wells: &T,
    empty: bool,
) -> Result<WellGroup, InventoryError> {
    let mut selected = WellGroup::default();
    for well in wells.well_refs(inventory)? {
        if inventory.well(well)?.is_empty() == empty {
            selected.push(well);
        }
    }
    Ok(selected)
}

/// Distinct containers referenced by a group, in first-seen order.
pub fn unique_containers(wells: &WellGroup) -> Vec<ContainerId> {
    let mut seen = Vec::new();
    for well in wells {
        if !seen.contains(&well.container) {
            seen.push(well.container);
        }
    }
    seen
}

/// Sorts a group by container, then by well index.
pub fn sort_well_group(wells: &WellGroup) -> WellGroup {
    let mut sorted = wells.as_slice().to_vec();
    sorted.sort();
    WellGroup::new(sorted)
}

/// The label of a well: its own name if set, otherwise `"{prefix}-{index}"` where the
/// prefix is `alternate` or the container name.
pub fn well_name(
    inventory: &Inventory,
    well: WellRef,
    alternate: Option<&str>,
) -> Result<String, InventoryError> {
    if let Some(name) = inventory.well(well)?.name() {
        return Ok(name.to_string());
    }
    let container = inventory.get_container(well.container)?;
    Ok(format!(
        "{}-{}",
        alternate.unwrap_or(container.name.as_str()),
        well.index
    ))
}
