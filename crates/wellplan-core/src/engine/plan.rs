use crate::core::models::ids::WellRef;
use crate::core::models::selection::WellGroup;
use crate::core::units::ResourceId;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TransferOptions {
    /// Start a new instruction group instead of merging with the previous one.
    pub new_group: bool,
    /// Use a single tip for every destination.
    pub one_tip: bool,
    pub mix_after: bool,
}

/// A liquid-handling step for an external transfer emitter. Nothing here moves liquid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Instruction {
    /// Dispense a catalog resource into each destination.
    Provision {
        resource: ResourceId,
        destinations: WellGroup,
        volumes: Vec<f64>,
    },
    /// Move liquid from one well to each destination.
    Transfer {
        source: WellRef,
        destinations: WellGroup,
        volumes: Vec<f64>,
        options: TransferOptions,
    },
    Mix {
        well: WellRef,
        volume: f64,
        repetitions: u32,
    },
}

impl Instruction {
    pub fn kind(&self) -> &'static str {
        match self {
            Instruction::Provision { .. } => "provision",
            Instruction::Transfer { .. } => "transfer",
            Instruction::Mix { .. } => "mix",
        }
    }

    /// Total liquid this instruction dispenses.
    pub fn total_volume(&self) -> f64 {
        match self {
            Instruction::Provision { volumes, .. } | Instruction::Transfer { volumes, .. } => {
                volumes.iter().sum()
            }
            Instruction::Mix { .. } => 0.0,
        }
    }
}
