use serde::Serialize;
use slotmap::new_key_type;

new_key_type! {
    pub struct ContainerId;
}

/// A reference to one well: the owning container plus the well's 0-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct WellRef {
    pub container: ContainerId,
    pub index: usize,
}

impl WellRef {
    pub fn new(container: ContainerId, index: usize) -> Self {
        Self { container, index }
    }
}
