use super::error::{EngineError, StateError, ValidationError};
use super::utils::query::well_name;
use crate::core::models::container_type::ContainerTypeSpec;
use crate::core::models::ids::WellRef;
use crate::core::models::inventory::Inventory;
use crate::core::models::selection::WellLike;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Which residual a well must keep after a usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ThresholdPolicy {
    /// The dead volume of the container type.
    #[default]
    DeadVolume,
    /// Dead volume plus the safe minimum volume.
    DeadAndSafeVolume,
    /// `|safe_min_volume - dead_volume|`, for wells whose dead volume already covers part of
    /// the safe film.
    SafeDeadDifference,
}

impl ThresholdPolicy {
    /// Maps the two boolean switches onto a policy; the difference policy wins when both are set.
    pub fn from_flags(use_safe_vol: bool, use_safe_dead_diff: bool) -> Self {
        match (use_safe_vol, use_safe_dead_diff) {
            (_, true) => ThresholdPolicy::SafeDeadDifference,
            (true, false) => ThresholdPolicy::DeadAndSafeVolume,
            (false, false) => ThresholdPolicy::DeadVolume,
        }
    }

    pub fn threshold(&self, spec: &ContainerTypeSpec) -> f64 {
        match self {
            ThresholdPolicy::DeadVolume => spec.dead_volume,
            ThresholdPolicy::DeadAndSafeVolume => spec.dead_volume + spec.safe_min_volume,
            ThresholdPolicy::SafeDeadDifference => (spec.safe_min_volume - spec.dead_volume).abs(),
        }
    }
}

/// Non-fatal advisory: using `usage` µL would leave the well below its threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeWarning {
    pub well: WellRef,
    pub label: String,
    pub available: f64,
    pub usage: f64,
    pub threshold: f64,
}

impl fmt::Display for VolumeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Insufficient volume in well '{}': {} µL available, {} µL requested, {} µL must remain",
            self.label, self.available, self.usage, self.threshold
        )
    }
}

fn recorded_volume(inventory: &Inventory, well: WellRef) -> Result<f64, EngineError> {
    inventory.well(well)?.volume().ok_or_else(|| {
        let label = well_name(inventory, well, None).unwrap_or_else(|_| format!("{:?}", well));
        EngineError::State(StateError::MissingVolume { well: label })
    })
}

/// Checks a single well; `Ok(None)` means the usage fits.
pub fn volume_check_well(
    inventory: &Inventory,
    well: WellRef,
    usage_volume: f64,
    policy: ThresholdPolicy,
) -> Result<Option<VolumeWarning>, EngineError> {
    if !usage_volume.is_finite() || usage_volume < 0.0 {
        return Err(ValidationError::InvalidVolume {
            input: "usage volume".to_string(),
            value: usage_volume,
        }
        .into());
    }
    let available = recorded_volume(inventory, well)?;
    let threshold = policy.threshold(inventory.container_type_of(well)?);

    if available - usage_volume < threshold {
        let warning = VolumeWarning {
            well,
            label: well_name(inventory, well, None)?,
            available,
            usage: usage_volume,
            threshold,
        };
        warn!("{}", warning);
        return Ok(Some(warning));
    }
    Ok(None)
}

/// Checks every well of a well, group or container and collects the warnings.
///
/// # Errors
///
/// Fails with a state error if any well in scope has no recorded volume, and with a
/// validation error for unknown wells or a negative usage.
pub fn volume_check<T: WellLike + ?Sized>(
    inventory: &Inventory,
    target: &T,
    usage_volume: f64,
    policy: ThresholdPolicy,
) -> Result<Vec<VolumeWarning>, EngineError> {
    let mut warnings = Vec::new();
    for well in target.well_refs(inventory)? {
        if let Some(warning) = volume_check_well(inventory, well, usage_volume, policy)? {
            warnings.push(warning);
        }
    }
    debug!(
        "Volume check for {} µL produced {} warning(s)",
        usage_volume,
        warnings.len()
    );
    Ok(warnings)
}

/// The volume that can still be aspirated from a well holding `volume` µL.
pub fn pipettable_volume(spec: &ContainerTypeSpec, volume: f64, use_safe_vol: bool) -> f64 {
    let mut correction = spec.dead_volume;
    if use_safe_vol {
        correction += spec.safe_min_volume;
    }
    (volume - correction).max(0.0)
}

/// Replaces the recorded volume of every well in scope by its pipettable residual.
///
/// Returns the target unchanged in shape, so a well stays a well, a group stays a group and a
/// container stays a container. Nothing is modified unless every well has a recorded volume.
pub fn set_pipettable_volume<T: WellLike + Clone>(
    inventory: &mut Inventory,
    target: &T,
    use_safe_vol: bool,
) -> Result<T, EngineError> {
    let wells = target.well_refs(inventory)?;
    let mut updates = Vec::with_capacity(wells.len());
    for well in wells {
        let volume = recorded_volume(inventory, well)?;
        let spec = inventory.container_type_of(well)?;
        updates.push((well, pipettable_volume(spec, volume, use_safe_vol)));
    }
    for (well, volume) in updates {
        inventory.set_volume(well, volume)?;
    }
    Ok(target.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ids::ContainerId;
    use crate::core::models::selection::WellGroup;

    fn setup() -> (Inventory, ContainerId) {
        let spec = ContainerTypeSpec::new("96-pcr", 96, 12, 160.0, 3.0, 5.0).unwrap();
        let mut inventory = Inventory::new();
        let plate = inventory.add_container("testplate_pcr", &spec);
        let all = inventory.all_wells(plate).unwrap();
        inventory.set_group_volume(&all, 20.0).unwrap();
        (inventory, plate)
    }

    fn set_range(inventory: &mut Inventory, plate: ContainerId, start: usize, count: usize, v: f64) {
        let wells = inventory.wells_from(plate, start, count, false).unwrap();
        inventory.set_group_volume(&wells, v).unwrap();
    }

    #[test]
    fn threshold_policy_from_flags() {
        assert_eq!(ThresholdPolicy::from_flags(false, false), ThresholdPolicy::DeadVolume);
        assert_eq!(ThresholdPolicy::from_flags(true, false), ThresholdPolicy::DeadAndSafeVolume);
        assert_eq!(ThresholdPolicy::from_flags(true, true), ThresholdPolicy::SafeDeadDifference);
    }

    #[test]
    fn volume_check_warns_only_when_residual_drops_below_dead_volume() {
        let (inventory, plate) = setup();
        let well = WellRef::new(plate, 0);
        let policy = ThresholdPolicy::DeadVolume;
        assert!(volume_check_well(&inventory, well, 1.0, policy).unwrap().is_none());
        let warning = volume_check_well(&inventory, well, 18.0, policy).unwrap().unwrap();
        assert_eq!(warning.available, 20.0);
        assert_eq!(warning.threshold, 3.0);
        assert!(warning.to_string().contains("testplate_pcr-0"));
    }

    #[test]
    fn volume_check_honours_threshold_policies() {
        let (mut inventory, plate) = setup();
        set_range(&mut inventory, plate, 15, 10, 2.0);
        set_range(&mut inventory, plate, 25, 5, 1.0);

        let low = WellRef::new(plate, 15);
        assert!(volume_check_well(&inventory, low, 0.0, ThresholdPolicy::DeadVolume).unwrap().is_some());
        let diff = WellRef::new(plate, 16);
        assert!(
            volume_check_well(&inventory, diff, 0.0, ThresholdPolicy::SafeDeadDifference)
                .unwrap()
                .is_none()
        );
        let tiny = WellRef::new(plate, 25);
        assert!(
            volume_check_well(&inventory, tiny, 0.0, ThresholdPolicy::DeadAndSafeVolume)
                .unwrap()
                .is_some()
        );
    }

    #[test]
    fn volume_check_aggregates_over_groups_and_containers() {
        let (mut inventory, plate) = setup();
        set_range(&mut inventory, plate, 30, 15, 4.0);

        let warnings = volume_check(&inventory, &plate, 2.0, ThresholdPolicy::DeadVolume).unwrap();
        assert_eq!(warnings.len(), 15);
        assert!(warnings.iter().all(|w| (30..45).contains(&w.well.index)));

        let group = inventory.wells_from(plate, 28, 4, false).unwrap();
        let warnings = volume_check(&inventory, &group, 2.0, ThresholdPolicy::DeadVolume).unwrap();
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn volume_check_fails_for_wells_without_volume() {
        let (mut inventory, plate) = setup();
        let well = WellRef::new(plate, 3);
        inventory.clear_volume(well).unwrap();
        let result = volume_check(&inventory, &well, 1.0, ThresholdPolicy::DeadVolume);
        assert!(matches!(
            result,
            Err(EngineError::State(StateError::MissingVolume { .. }))
        ));
    }

    #[test]
    fn set_pipettable_volume_keeps_the_shape_of_its_input() {
        let (mut inventory, plate) = setup();

        let well = WellRef::new(plate, 95);
        let returned = set_pipettable_volume(&mut inventory, &well, false).unwrap();
        assert_eq!(returned, well);
        assert_eq!(inventory.well(well).unwrap().volume(), Some(17.0));

        let safe = WellRef::new(plate, 45);
        set_pipettable_volume(&mut inventory, &safe, true).unwrap();
        assert_eq!(inventory.well(safe).unwrap().volume(), Some(12.0));

        let group = inventory.wells_from(plate, 90, 4, false).unwrap();
        let returned: WellGroup = set_pipettable_volume(&mut inventory, &group, false).unwrap();
        assert_eq!(returned, group);
        for w in &group {
            assert_eq!(inventory.well(*w).unwrap().volume(), Some(17.0));
        }

        let all = inventory.all_wells(plate).unwrap();
        inventory.set_group_volume(&all, 20.0).unwrap();
        let returned = set_pipettable_volume(&mut inventory, &plate, false).unwrap();
        assert_eq!(returned, plate);
        assert!(
            inventory
                .container(plate)
                .unwrap()
                .wells()
                .iter()
                .all(|w| w.volume() == Some(17.0))
        );
    }

    #[test]
    fn set_pipettable_volume_is_all_or_nothing() {
        let (mut inventory, plate) = setup();
        inventory.clear_volume(WellRef::new(plate, 2)).unwrap();
        let group = inventory.wells_from(plate, 0, 4, false).unwrap();
        assert!(set_pipettable_volume(&mut inventory, &group, false).is_err());
        assert_eq!(inventory.well(WellRef::new(plate, 0)).unwrap().volume(), Some(20.0));
    }

    #[test]
    fn pipettable_volume_never_goes_negative() {
        let spec = ContainerTypeSpec::new("96-pcr", 96, 12, 160.0, 3.0, 5.0).unwrap();
        assert_eq!(pipettable_volume(&spec, 2.0, false), 0.0);
        assert_eq!(pipettable_volume(&spec, 10.0, true), 2.0);
    }
}
