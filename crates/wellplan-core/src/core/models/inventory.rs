use super::container::Container;
use super::container_type::ContainerTypeSpec;
use super::ids::{ContainerId, WellRef};
use super::selection::WellGroup;
use super::well::Well;
use slotmap::SlotMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum InventoryError {
    #[error("Container {0:?} does not exist in this inventory")]
    UnknownContainer(ContainerId),

    #[error("Well index {index} is out of range for container '{container}' ({well_count} wells)")]
    WellOutOfRange {
        container: String,
        index: usize,
        well_count: usize,
    },

    #[error("Cannot select {count} wells from index {start} of container '{container}'")]
    SelectionOutOfRange {
        container: String,
        start: usize,
        count: usize,
    },

    #[error("Volume must be a finite, non-negative number of microliters, got {0}")]
    InvalidVolume(f64),
}

/// Owner of every container created during a protocol session.
///
/// Containers are stored in a slot map so their ids stay valid for the lifetime of the
/// inventory; wells are addressed through [`WellRef`]s into those containers.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    containers: SlotMap<ContainerId, Container>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new container of the given type, with every well empty.
    pub fn add_container(&mut self, name: &str, container_type: &ContainerTypeSpec) -> ContainerId {
        self.containers
            .insert(Container::new(name, container_type))
    }

    pub fn container(&self, id: ContainerId) -> Option<&Container> {
        self.containers.get(id)
    }

    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    /// Returns the first container with the given name.
    pub fn find_container_by_name(&self, name: &str) -> Option<ContainerId> {
        self.containers
            .iter()
            .find(|(_, c)| c.name == name)
            .map(|(id, _)| id)
    }

    /// Smallest `"{base}-{n}"` (n starting at 1) not used by any container yet.
    pub fn next_free_name(&self, base: &str) -> String {
        (1..)
            .map(|n| format!("{}-{}", base, n))
            .find(|candidate| self.find_container_by_name(candidate).is_none())
            .unwrap_or_else(|| base.to_string())
    }

    pub fn get_container(&self, id: ContainerId) -> Result<&Container, InventoryError> {
        self.containers
            .get(id)
            .ok_or(InventoryError::UnknownContainer(id))
    }

    pub fn container_type_of(&self, well: WellRef) -> Result<&ContainerTypeSpec, InventoryError> {
        Ok(self.get_container(well.container)?.container_type())
    }

    pub fn well(&self, well: WellRef) -> Result<&Well, InventoryError> {
        let container = self.get_container(well.container)?;
        container
            .well(well.index)
            .ok_or_else(|| InventoryError::WellOutOfRange {
                container: container.name.clone(),
                index: well.index,
                well_count: container.well_count(),
            })
    }

    fn well_mut(&mut self, well: WellRef) -> Result<&mut Well, InventoryError> {
        let container = self
            .containers
            .get_mut(well.container)
            .ok_or(InventoryError::UnknownContainer(well.container))?;
        let well_count = container.well_count();
        let name = container.name.clone();
        container
            .well_mut(well.index)
            .ok_or(InventoryError::WellOutOfRange {
                container: name,
                index: well.index,
                well_count,
            })
    }

    pub fn set_volume(&mut self, well: WellRef, volume: f64) -> Result<(), InventoryError> {
        if !volume.is_finite() || volume < 0.0 {
            return Err(InventoryError::InvalidVolume(volume));
        }
        self.well_mut(well)?.volume = Some(volume);
        Ok(())
    }

    pub fn clear_volume(&mut self, well: WellRef) -> Result<(), InventoryError> {
        self.well_mut(well)?.volume = None;
        Ok(())
    }

    pub fn set_name(&mut self, well: WellRef, name: &str) -> Result<(), InventoryError> {
        self.well_mut(well)?.name = Some(name.to_string());
        Ok(())
    }

    /// Every well of a container, in index order.
    pub fn all_wells(&self, id: ContainerId) -> Result<WellGroup, InventoryError> {
        let container = self.get_container(id)?;
        Ok((0..container.well_count())
            .map(|index| WellRef::new(id, index))
            .collect())
    }

    /// `count` wells of a container starting at `start`, walking row-wise or column-wise.
    pub fn wells_from(
        &self,
        id: ContainerId,
        start: usize,
        count: usize,
        columnwise: bool,
    ) -> Result<WellGroup, InventoryError> {
        let container = self.get_container(id)?;
        let indices = container.wells_from(start, count, columnwise).ok_or_else(|| {
            InventoryError::SelectionOutOfRange {
                container: container.name.clone(),
                start,
                count,
            }
        })?;
        Ok(indices
            .into_iter()
            .map(|index| WellRef::new(id, index))
            .collect())
    }

    /// Sets the same volume on every well of a group.
    pub fn set_group_volume(&mut self, wells: &WellGroup, volume: f64) -> Result<(), InventoryError> {
        for well in wells.iter() {
            self.set_volume(*well, volume)?;
        }
        Ok(())
    }
}
