use super::error::{EngineError, ValidationError};
use crate::core::models::container_type::ContainerTypeSpec;
use crate::core::volume::{base_margin, round_volume, usable_volume};
use serde::Serialize;
use tracing::debug;

const FLOOR_EPSILON: f64 = 1e-9;

/// How a reaction count is spread over destination wells.
///
/// `volume_per_well[i]` is the mastermix load of well `i`, i.e. `reactions_per_entry[i]`
/// inflated reactions. The physical fill of a well additionally carries `base_margin`
/// (see [`ReactionPlan::well_fills`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReactionPlan {
    pub container_type: String,
    pub reactions_total: usize,
    pub per_reaction_volume: f64,
    pub multiplier: f64,
    /// `per_reaction_volume * multiplier`.
    pub inflated_volume: f64,
    pub usable_volume: f64,
    pub base_margin: f64,
    pub reactions_per_well: usize,
    pub wells_needed: usize,
    pub reactions_per_entry: Vec<usize>,
    pub volume_per_well: Vec<f64>,
}

/// `floor(usable / inflated)`, tolerant to quotients a hair below an integer.
pub fn reactions_per_well(usable_volume: f64, inflated_volume: f64) -> usize {
    if inflated_volume <= 0.0 || !usable_volume.is_finite() {
        return 0;
    }
    (usable_volume / inflated_volume + FLOOR_EPSILON).floor() as usize
}

/// Splits `reactions` into chunks of `per_well`; only the last chunk may be smaller.
pub fn chunk_reactions(reactions: usize, per_well: usize) -> Vec<usize> {
    if per_well == 0 {
        return Vec::new();
    }
    let mut chunks = Vec::with_capacity(reactions.div_ceil(per_well));
    let mut remaining = reactions;
    while remaining > 0 {
        let chunk = remaining.min(per_well);
        chunks.push(chunk);
        remaining -= chunk;
    }
    chunks
}

impl ReactionPlan {
    /// Builds the plan for `reactions` reactions of `per_reaction_volume` µL each.
    ///
    /// # Errors
    ///
    /// * [`ValidationError::NonPositiveReactions`] for a zero reaction count.
    /// * [`ValidationError::InvalidVolume`] / [`ValidationError::InvalidMultiplier`] for
    ///   non-positive volumes or multipliers below 1.
    /// * A configuration error if the container type has no usable volume under the policy.
    /// * [`ValidationError::ReactionExceedsWell`] if one inflated reaction does not fit a well.
    pub fn compute(
        reactions: usize,
        per_reaction_volume: f64,
        multiplier: f64,
        container_type: &ContainerTypeSpec,
        use_dead_vol: bool,
        use_safe_vol: bool,
    ) -> Result<Self, EngineError> {
        if reactions == 0 {
            return Err(ValidationError::NonPositiveReactions.into());
        }
        if !per_reaction_volume.is_finite() || per_reaction_volume <= 0.0 {
            return Err(ValidationError::InvalidVolume {
                input: "per-reaction volume".to_string(),
                value: per_reaction_volume,
            }
            .into());
        }
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(ValidationError::InvalidMultiplier(multiplier).into());
        }

        let usable = usable_volume(container_type, use_dead_vol, use_safe_vol)?;
        let margin = base_margin(container_type, use_dead_vol, use_safe_vol);
        let inflated = per_reaction_volume * multiplier;

        let per_well = reactions_per_well(usable, inflated);
        if per_well == 0 {
            return Err(ValidationError::ReactionExceedsWell {
                required: round_volume(inflated),
                usable,
                container_type: container_type.shortname.clone(),
            }
            .into());
        }

        let reactions_per_entry = chunk_reactions(reactions, per_well);
        let volume_per_well = reactions_per_entry
            .iter()
            .map(|&chunk| chunk as f64 * inflated)
            .collect();

        debug!(
            "Packing {} reaction(s) at {:.3} µL each: {} per well over {} well(s)",
            reactions,
            inflated,
            per_well,
            reactions_per_entry.len()
        );

        Ok(Self {
            container_type: container_type.shortname.clone(),
            reactions_total: reactions,
            per_reaction_volume,
            multiplier,
            inflated_volume: inflated,
            usable_volume: usable,
            base_margin: margin,
            reactions_per_well: per_well,
            wells_needed: reactions_per_entry.len(),
            reactions_per_entry,
            volume_per_well,
        })
    }

    /// The volume each destination well is stamped with: load plus margin, to 2 decimals.
    pub fn well_fills(&self) -> Vec<f64> {
        self.volume_per_well
            .iter()
            .map(|load| round_volume(self.base_margin + load))
            .collect()
    }

    /// Mastermix volume across all wells, excluding margins.
    pub fn total_load(&self) -> f64 {
        self.volume_per_well.iter().sum()
    }
}
