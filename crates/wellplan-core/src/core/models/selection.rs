use super::ids::{ContainerId, WellRef};
use super::inventory::{Inventory, InventoryError};
use serde::Serialize;

/// An ordered view over wells, possibly spanning several containers.
///
/// A group does not own anything; it only refers to wells held by an [`Inventory`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WellGroup {
    wells: Vec<WellRef>,
}

impl WellGroup {
    pub fn new(wells: Vec<WellRef>) -> Self {
        Self { wells }
    }

    pub fn push(&mut self, well: WellRef) {
        self.wells.push(well);
    }

    pub fn extend(&mut self, other: WellGroup) {
        self.wells.extend(other.wells);
    }

    pub fn len(&self) -> usize {
        self.wells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wells.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WellRef> {
        self.wells.iter()
    }

    pub fn as_slice(&self) -> &[WellRef] {
        &self.wells
    }

    pub fn first(&self) -> Option<WellRef> {
        self.wells.first().copied()
    }

    pub fn last(&self) -> Option<WellRef> {
        self.wells.last().copied()
    }

    pub fn indices(&self) -> Vec<usize> {
        self.wells.iter().map(|w| w.index).collect()
    }
}

impl FromIterator<WellRef> for WellGroup {
    fn from_iter<I: IntoIterator<Item = WellRef>>(iter: I) -> Self {
        Self {
            wells: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for WellGroup {
    type Item = WellRef;
    type IntoIter = std::vec::IntoIter<WellRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.wells.into_iter()
    }
}

impl<'a> IntoIterator for &'a WellGroup {
    type Item = &'a WellRef;
    type IntoIter = std::slice::Iter<'a, WellRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.wells.iter()
    }
}

impl From<Vec<WellRef>> for WellGroup {
    fn from(wells: Vec<WellRef>) -> Self {
        Self::new(wells)
    }
}

/// Anything that can enumerate the wells it stands for.
///
/// A single well yields itself, a group yields its members in order, and a container
/// yields all of its wells in index order.
pub trait WellLike {
    fn well_refs(&self, inventory: &Inventory) -> Result<Vec<WellRef>, InventoryError>;
}

/// Marker for multi-well selections (groups and containers).
///
/// Operations that only make sense over a collection, such as finding the first empty
/// well or detecting a stamp shape, take this bound so a bare [`WellRef`] is rejected at
/// compile time.
pub trait WellCollection: WellLike {}

impl WellLike for WellRef {
    fn well_refs(&self, inventory: &Inventory) -> Result<Vec<WellRef>, InventoryError> {
        inventory.well(*self)?;
        Ok(vec![*self])
    }
}

impl WellLike for WellGroup {
    fn well_refs(&self, inventory: &Inventory) -> Result<Vec<WellRef>, InventoryError> {
        for well in &self.wells {
            inventory.well(*well)?;
        }
        Ok(self.wells.clone())
    }
}

impl WellLike for ContainerId {
    fn well_refs(&self, inventory: &Inventory) -> Result<Vec<WellRef>, InventoryError> {
        Ok(inventory.all_wells(*self)?.wells)
    }
}

impl WellCollection for WellGroup {}
impl WellCollection for ContainerId {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::container_type::ContainerTypeSpec;

    fn setup() -> (Inventory, ContainerId) {
        let spec = ContainerTypeSpec::new("96-pcr", 96, 12, 160.0, 3.0, 5.0).unwrap();
        let mut inventory = Inventory::new();
        let id = inventory.add_container("plate", &spec);
        (inventory, id)
    }

    #[test]
    fn single_well_yields_itself() {
        let (inventory, id) = setup();
        let well = WellRef::new(id, 7);
        assert_eq!(well.well_refs(&inventory).unwrap(), vec![well]);
    }

    #[test]
    fn container_yields_all_wells_in_index_order() {
        let (inventory, id) = setup();
        let wells = id.well_refs(&inventory).unwrap();
        assert_eq!(wells.len(), 96);
        assert_eq!(wells[0].index, 0);
        assert_eq!(wells[95].index, 95);
    }

    #[test]
    fn group_preserves_order_and_rejects_unknown_wells() {
        let (inventory, id) = setup();
        let group = WellGroup::new(vec![WellRef::new(id, 3), WellRef::new(id, 1)]);
        assert_eq!(group.well_refs(&inventory).unwrap(), group.as_slice().to_vec());

        let bad = WellGroup::new(vec![WellRef::new(id, 200)]);
        assert!(bad.well_refs(&inventory).is_err());
    }
}
