use crate::core::labware::registry::ContainerTypeRegistry;
use crate::core::models::ids::{ContainerId, WellRef};
use crate::core::models::inventory::Inventory;
use crate::core::models::selection::WellGroup;
use crate::core::units::ResourceId;
use crate::core::volume::round_volume;
use crate::engine::allocator::{self, AllocationCursor, AllocationTarget};
use crate::engine::config::{MIX_INPUT_THRESHOLD, MIX_REPETITIONS, MastermixConfig};
use crate::engine::error::{EngineError, StateError, ValidationError};
use crate::engine::packing::ReactionPlan;
use crate::engine::plan::{Instruction, TransferOptions};
use crate::engine::utils::query::well_name;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShortfallKind {
    /// The source holds less than the transfer draws.
    InsufficientVolume,
    /// The source holds enough, but not once its dead volume is set aside.
    BelowDeadVolume,
}

/// A source aliquot that cannot fully supply its share of the mastermix.
///
/// `needed` is what the transfer draws from the source: the inflated reactions plus the
/// aliquot's share of every destination margin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AliquotShortfall {
    pub source: WellRef,
    pub label: String,
    pub available: f64,
    pub needed: f64,
    pub kind: ShortfallKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MastermixOutput {
    pub wells: WellGroup,
    /// Fill of each destination well, margin included.
    pub volumes: Vec<f64>,
    pub plan: ReactionPlan,
    pub instructions: Vec<Instruction>,
    pub shortfalls: Vec<AliquotShortfall>,
    pub created_containers: Vec<ContainerId>,
    /// Pass back as `Destination::Resume` to keep filling the same container.
    pub cursor: AllocationCursor,
}

struct ValidatedInputs {
    resources: Vec<(ResourceId, f64)>,
    aliquots: Vec<(WellRef, f64)>,
}

impl ValidatedInputs {
    fn per_reaction_volume(&self) -> f64 {
        self.resources.iter().map(|(_, v)| v).sum::<f64>()
            + self.aliquots.iter().map(|(_, v)| v).sum::<f64>()
    }

    fn len(&self) -> usize {
        self.resources.len() + self.aliquots.len()
    }
}

/// Plans a mastermix, claims and fills its destination wells, and returns the instructions
/// that would produce it.
///
/// All inputs are validated and the reaction plan is computed before the inventory is touched,
/// so a rejected request leaves no trace. Once allocation has started a failure may leave newly
/// created containers behind.
#[instrument(skip_all, name = "mastermix_workflow", fields(name = %config.name))]
pub fn run(
    inventory: &mut Inventory,
    registry: &ContainerTypeRegistry,
    config: &MastermixConfig,
) -> Result<MastermixOutput, EngineError> {
    // === Phase 1: Validation ===
    let inputs = validate_inputs(inventory, config)?;
    let target = allocator::resolve_destination(
        inventory,
        registry,
        &config.destination,
        config.columnwise,
    )?;
    let plan = ReactionPlan::compute(
        config.reactions,
        inputs.per_reaction_volume(),
        config.multiplier,
        &target.container_type,
        config.use_dead_volume,
        config.use_safe_volume,
    )?;
    info!(
        "Mastermix '{}': {} reaction(s) in {} '{}' well(s), {} per well",
        config.name, plan.reactions_total, plan.wells_needed, plan.container_type, plan.reactions_per_well
    );

    // === Phase 2: Allocation ===
    let (wells, created_containers, cursor) = allocate_wells(inventory, &target, &plan, &config.name)?;
    let volumes = plan.well_fills();
    for (well, volume) in wells.iter().zip(&volumes) {
        inventory.set_volume(*well, *volume)?;
    }

    // === Phase 3: Instructions ===
    let per_reaction = plan.per_reaction_volume;
    let mut instructions = Vec::with_capacity(inputs.len() + wells.len());

    for (resource, volume) in &inputs.resources {
        instructions.push(Instruction::Provision {
            resource: resource.clone(),
            destinations: wells.clone(),
            volumes: split_by_ratio(&volumes, volume / per_reaction),
        });
    }

    let mut shortfalls = Vec::new();
    for (source, volume) in &inputs.aliquots {
        let ratio = volume / per_reaction;
        let split = split_by_ratio(&volumes, ratio);
        let drawn: f64 = split.iter().sum();
        let reacted = plan.reactions_total as f64 * plan.multiplier * per_reaction * ratio;
        if let Some(shortfall) = check_aliquot(inventory, *source, reacted.max(drawn))? {
            warn!(
                "Aliquot '{}' holds {} µL but the mastermix needs {} µL ({:?})",
                shortfall.label, shortfall.available, shortfall.needed, shortfall.kind
            );
            shortfalls.push(shortfall);
        }
        drain_source(inventory, *source, drawn)?;
        instructions.push(Instruction::Transfer {
            source: *source,
            destinations: wells.clone(),
            volumes: split,
            options: TransferOptions {
                new_group: true,
                ..TransferOptions::default()
            },
        });
    }

    if inputs.len() > MIX_INPUT_THRESHOLD {
        debug!("{} inputs combined; scheduling a mix for every well", inputs.len());
        for (well, volume) in wells.iter().zip(&volumes) {
            instructions.push(Instruction::Mix {
                well: *well,
                volume: round_volume(volume / 2.0),
                repetitions: MIX_REPETITIONS,
            });
        }
    }

    info!(
        "Mastermix '{}' complete: {} instruction(s), {} shortfall(s).",
        config.name,
        instructions.len(),
        shortfalls.len()
    );
    Ok(MastermixOutput {
        wells,
        volumes,
        plan,
        instructions,
        shortfalls,
        created_containers,
        cursor,
    })
}

fn validate_inputs(
    inventory: &Inventory,
    config: &MastermixConfig,
) -> Result<ValidatedInputs, EngineError> {
    if config.reactions == 0 {
        return Err(ValidationError::NonPositiveReactions.into());
    }
    if !config.multiplier.is_finite() || config.multiplier < 1.0 {
        return Err(ValidationError::InvalidMultiplier(config.multiplier).into());
    }
    if config.input_count() == 0 {
        return Err(ValidationError::NoInputs.into());
    }

    let mut resources = Vec::with_capacity(config.resources.len());
    let mut seen_resources = HashSet::new();
    for (raw_id, volume) in &config.resources {
        let id: ResourceId = raw_id.parse()?;
        ensure_positive(raw_id, *volume)?;
        if !seen_resources.insert(id.clone()) {
            return Err(ValidationError::DuplicateInput(raw_id.clone()).into());
        }
        resources.push((id, *volume));
    }

    let mut aliquots = Vec::with_capacity(config.aliquots.len());
    let mut seen_wells = HashSet::new();
    for (well, volume) in &config.aliquots {
        let label = well_name(inventory, *well, None)?;
        ensure_positive(&label, *volume)?;
        if inventory.well(*well)?.volume().is_none() {
            return Err(StateError::MissingVolume { well: label }.into());
        }
        if !seen_wells.insert(*well) {
            return Err(ValidationError::DuplicateInput(label).into());
        }
        aliquots.push((*well, *volume));
    }

    Ok(ValidatedInputs {
        resources,
        aliquots,
    })
}

fn ensure_positive(input: &str, volume: f64) -> Result<(), ValidationError> {
    if !volume.is_finite() || volume <= 0.0 {
        return Err(ValidationError::InvalidVolume {
            input: input.to_string(),
            value: volume,
        });
    }
    Ok(())
}

fn allocate_wells(
    inventory: &mut Inventory,
    target: &AllocationTarget,
    plan: &ReactionPlan,
    name: &str,
) -> Result<(WellGroup, Vec<ContainerId>, AllocationCursor), EngineError> {
    let allocation = allocator::allocate(inventory, target, plan.wells_needed, name)?;
    Ok((
        allocation.wells,
        allocation.created_containers,
        allocation.cursor,
    ))
}

fn split_by_ratio(fills: &[f64], ratio: f64) -> Vec<f64> {
    fills.iter().map(|fill| round_volume(fill * ratio)).collect()
}

fn check_aliquot(
    inventory: &Inventory,
    source: WellRef,
    needed: f64,
) -> Result<Option<AliquotShortfall>, EngineError> {
    let available = inventory.well(source)?.volume().unwrap_or(0.0);
    let dead_volume = inventory.container_type_of(source)?.dead_volume;

    let kind = if available < needed {
        ShortfallKind::InsufficientVolume
    } else if available - dead_volume < needed {
        ShortfallKind::BelowDeadVolume
    } else {
        return Ok(None);
    };
    Ok(Some(AliquotShortfall {
        source,
        label: well_name(inventory, source, None)?,
        available,
        needed: round_volume(needed),
        kind,
    }))
}

/// Records the draw on the source. An overdraw empties the well; it has already been reported
/// as an [`ShortfallKind::InsufficientVolume`] shortfall.
fn drain_source(inventory: &mut Inventory, source: WellRef, drawn: f64) -> Result<(), EngineError> {
    let available = inventory.well(source)?.volume().unwrap_or(0.0);
    let left = available - drawn;
    if left < 0.0 {
        debug!(
            "Source {:?} overdrawn by {} µL; recording it as empty",
            source,
            round_volume(-left)
        );
    }
    inventory.set_volume(source, left.max(0.0))?;
    Ok(())
}
