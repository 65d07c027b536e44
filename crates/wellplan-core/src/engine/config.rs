use super::allocator::Destination;
use crate::core::models::ids::WellRef;
use thiserror::Error;

/// Overage applied to every mastermix unless the caller overrides it.
pub const DEFAULT_MULTIPLIER: f64 = 1.3;
/// Mixes are scheduled when more inputs than this are combined.
pub const MIX_INPUT_THRESHOLD: usize = 3;
pub const MIX_REPETITIONS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MastermixConfig {
    /// Label for the destination wells and prefix for newly created containers.
    pub name: String,
    pub destination: Destination,
    pub reactions: usize,
    /// Resource identifiers with their per-reaction volume, still unparsed.
    pub resources: Vec<(String, f64)>,
    /// Existing wells used as inputs, with their per-reaction volume.
    pub aliquots: Vec<(WellRef, f64)>,
    pub multiplier: f64,
    pub use_dead_volume: bool,
    pub use_safe_volume: bool,
    pub columnwise: bool,
}

impl MastermixConfig {
    pub fn input_count(&self) -> usize {
        self.resources.len() + self.aliquots.len()
    }
}

#[derive(Default)]
pub struct MastermixConfigBuilder {
    name: Option<String>,
    destination: Option<Destination>,
    reactions: Option<usize>,
    resources: Vec<(String, f64)>,
    aliquots: Vec<(WellRef, f64)>,
    multiplier: Option<f64>,
    use_dead_volume: Option<bool>,
    use_safe_volume: Option<bool>,
    columnwise: bool,
}

impl MastermixConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
    pub fn destination(mut self, destination: Destination) -> Self {
        self.destination = Some(destination);
        self
    }
    pub fn reactions(mut self, reactions: usize) -> Self {
        self.reactions = Some(reactions);
        self
    }
    pub fn resource(mut self, id: impl Into<String>, volume: f64) -> Self {
        self.resources.push((id.into(), volume));
        self
    }
    pub fn aliquot(mut self, well: WellRef, volume: f64) -> Self {
        self.aliquots.push((well, volume));
        self
    }
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }
    pub fn use_dead_volume(mut self, flag: bool) -> Self {
        self.use_dead_volume = Some(flag);
        self
    }
    pub fn use_safe_volume(mut self, flag: bool) -> Self {
        self.use_safe_volume = Some(flag);
        self
    }
    pub fn columnwise(mut self, flag: bool) -> Self {
        self.columnwise = flag;
        self
    }

    pub fn build(self) -> Result<MastermixConfig, ConfigError> {
        Ok(MastermixConfig {
            name: self.name.ok_or(ConfigError::MissingParameter("name"))?,
            destination: self
                .destination
                .ok_or(ConfigError::MissingParameter("destination"))?,
            reactions: self
                .reactions
                .ok_or(ConfigError::MissingParameter("reactions"))?,
            resources: self.resources,
            aliquots: self.aliquots,
            multiplier: self.multiplier.unwrap_or(DEFAULT_MULTIPLIER),
            use_dead_volume: self.use_dead_volume.unwrap_or(false),
            use_safe_volume: self.use_safe_volume.unwrap_or(true),
            columnwise: self.columnwise,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_applies_defaults() {
        let config = MastermixConfigBuilder::new()
            .name("pcr_mm")
            .destination(Destination::NewContainers("micro-1.5".to_string()))
            .reactions(12)
            .resource("rs18s6ccz8x5ny", 10.0)
            .build()
            .unwrap();
        assert_eq!(config.multiplier, DEFAULT_MULTIPLIER);
        assert!(!config.use_dead_volume);
        assert!(config.use_safe_volume);
        assert!(!config.columnwise);
        assert_eq!(config.input_count(), 1);
    }

    #[test]
    fn build_reports_the_first_missing_parameter() {
        let missing_destination = MastermixConfigBuilder::new().name("mm").reactions(3).build();
        assert_eq!(
            missing_destination,
            Err(ConfigError::MissingParameter("destination"))
        );
        let missing_name = MastermixConfigBuilder::new().build();
        assert_eq!(missing_name, Err(ConfigError::MissingParameter("name")));
    }
}
