use super::container_type::ContainerTypeSpec;
use super::well::Well;
use serde::Serialize;

/// A physical container and the wells it exclusively owns.
///
/// Wells are created together with the container and are never removed from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Container {
    pub name: String,
    container_type: ContainerTypeSpec,
    pub(crate) wells: Vec<Well>,
}

impl Container {
    pub(crate) fn new(name: &str, container_type: &ContainerTypeSpec) -> Self {
        Self {
            name: name.to_string(),
            container_type: container_type.clone(),
            wells: (0..container_type.well_count).map(Well::new).collect(),
        }
    }

    pub fn container_type(&self) -> &ContainerTypeSpec {
        &self.container_type
    }

    pub fn wells(&self) -> &[Well] {
        &self.wells
    }

    pub fn well(&self, index: usize) -> Option<&Well> {
        self.wells.get(index)
    }

    pub(crate) fn well_mut(&mut self, index: usize) -> Option<&mut Well> {
        self.wells.get_mut(index)
    }

    pub fn well_count(&self) -> usize {
        self.wells.len()
    }

    /// Indices of `count` wells starting at `start`, walking row-wise or column-wise.
    ///
    /// Returns `None` when the walk would run past the last well of the container.
    pub fn wells_from(&self, start: usize, count: usize, columnwise: bool) -> Option<Vec<usize>> {
        if start >= self.well_count() {
            return None;
        }
        let first = self.container_type.fill_position(start, columnwise);
        if first + count > self.well_count() {
            return None;
        }
        Some(
            (first..first + count)
                .map(|position| {
                    self.container_type
                        .index_at_fill_position(position, columnwise)
                })
                .collect(),
        )
    }
}
