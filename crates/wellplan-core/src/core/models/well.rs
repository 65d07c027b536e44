use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Well {
    pub index: usize,                // 0-based position within the owning container
    pub(crate) volume: Option<f64>,  // Recorded liquid volume in microliters, if any
    pub(crate) name: Option<String>, // Optional user-facing label
}

impl Well {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index,
            volume: None,
            name: None,
        }
    }

    pub fn volume(&self) -> Option<f64> {
        self.volume
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// A well is empty when no volume has ever been recorded for it.
    pub fn is_empty(&self) -> bool {
        self.volume.is_none()
    }
}
