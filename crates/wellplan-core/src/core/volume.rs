use super::models::container_type::ContainerTypeSpec;
use thiserror::Error;

/// Fraction of the nominal well volume that may ever be filled.
pub const HEADROOM_FRACTION: f64 = 0.9;

#[derive(Debug, Error, Clone, PartialEq)]
#[error(
    "Container type '{container_type}' cannot host any liquid under the requested policy (usable volume {usable} µL)"
)]
pub struct UsableVolumeError {
    pub container_type: String,
    pub usable: f64,
}

/// Volume reserved in every well for the requested dead/safe-volume policy.
pub fn base_margin(spec: &ContainerTypeSpec, use_dead_vol: bool, use_safe_vol: bool) -> f64 {
    let mut margin = 0.0;
    if use_dead_vol {
        margin += spec.dead_volume;
    }
    if use_safe_vol {
        margin += spec.safe_min_volume;
    }
    margin
}

/// Liquid volume a single well of this type may carry on top of the reserved margins.
///
/// The ceiling is [`HEADROOM_FRACTION`] of the nominal well volume, reduced by the dead
/// volume and/or the safe minimum volume when the corresponding flag is set.
///
/// # Errors
///
/// Returns [`UsableVolumeError`] when nothing is left after the deductions.
pub fn usable_volume(
    spec: &ContainerTypeSpec,
    use_dead_vol: bool,
    use_safe_vol: bool,
) -> Result<f64, UsableVolumeError> {
    let usable = HEADROOM_FRACTION * spec.well_volume - base_margin(spec, use_dead_vol, use_safe_vol);
    if usable <= 0.0 {
        return Err(UsableVolumeError {
            container_type: spec.shortname.clone(),
            usable,
        });
    }
    Ok(usable)
}

/// Rounds a volume to two decimal places.
pub fn round_volume(volume: f64) -> f64 {
    (volume * 100.0).round() / 100.0
}
