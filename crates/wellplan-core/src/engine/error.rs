use thiserror::Error;

use crate::core::models::container_type::InvalidContainerTypeError;
use crate::core::models::inventory::InventoryError;
use crate::core::units::ResourceIdError;
use crate::core::volume::UsableVolumeError;

/// Errors raised by the engine and the workflows.
///
/// Every variant is fatal for the call that produced it. Non-fatal advisories are
/// returned as data instead (see [`crate::engine::guard::VolumeWarning`]).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// Container constants make the requested policy impossible.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Malformed input, rejected before anything is mutated.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A physical precondition on a well does not hold.
    #[error("State error: {0}")]
    State(#[from] StateError),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Unknown container type '{0}'")]
    UnknownContainerType(String),

    #[error(transparent)]
    InvalidContainerType(#[from] InvalidContainerTypeError),

    #[error(transparent)]
    NoUsableVolume(#[from] UsableVolumeError),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Reaction count must be positive")]
    NonPositiveReactions,

    #[error("Volume for '{input}' must be a positive number of microliters, got {value}")]
    InvalidVolume { input: String, value: f64 },

    #[error(transparent)]
    InvalidResourceId(#[from] ResourceIdError),

    #[error("Overage multiplier must be a finite number of at least 1, got {0}")]
    InvalidMultiplier(f64),

    #[error("'{0}' appears more than once in the mastermix inputs")]
    DuplicateInput(String),

    #[error("A mastermix needs at least one resource or aliquot")]
    NoInputs,

    #[error(
        "The mastermix volume for 1 reaction ({required} µL) is bigger than the maximum volume allowed in container type '{container_type}' ({usable} µL)"
    )]
    ReactionExceedsWell {
        required: f64,
        usable: f64,
        container_type: String,
    },

    #[error("Capacity must be positive, got {0}")]
    NonPositiveCapacity(f64),

    #[error("Operation '{0}' needs at least one well")]
    EmptySelection(&'static str),

    #[error("Operation '{operation}' needs at least {required} wells, got {actual}")]
    SelectionTooSmall {
        operation: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Operation '{0}' needs all wells to be in the same container")]
    MixedContainers(&'static str),

    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    #[error("Well '{well}' has no recorded volume")]
    MissingVolume { well: String },

    #[error("Container '{container}' is not empty at expected offset: well {index} already holds liquid")]
    NotEmpty { container: String, index: usize },
}

impl From<InventoryError> for EngineError {
    fn from(e: InventoryError) -> Self {
        EngineError::Validation(ValidationError::Inventory(e))
    }
}

impl From<UsableVolumeError> for EngineError {
    fn from(e: UsableVolumeError) -> Self {
        EngineError::Configuration(ConfigurationError::NoUsableVolume(e))
    }
}

impl From<ResourceIdError> for EngineError {
    fn from(e: ResourceIdError) -> Self {
        EngineError::Validation(ValidationError::InvalidResourceId(e))
    }
}
