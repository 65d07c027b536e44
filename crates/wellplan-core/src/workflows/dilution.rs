use crate::core::models::ids::WellRef;
use crate::core::models::inventory::Inventory;
use crate::core::models::selection::WellGroup;
use crate::engine::error::{EngineError, ValidationError};
use crate::engine::plan::{Instruction, TransferOptions};
use crate::engine::utils::query::sort_well_group;
use tracing::{debug, instrument};

/// Plans a row-wise serial dilution across the span between the lowest and highest index of
/// `group`.
///
/// The most concentrated well (the first of the span, or the last when `reverse` is set)
/// receives `2 * volume` from `source`. Each following well then receives `volume` from its
/// predecessor, all with one tip. Every well of the span other than the two ends is expected to
/// hold diluent already.
#[instrument(skip_all, name = "serial_dilution")]
pub fn serial_dilute_rowwise(
    inventory: &Inventory,
    source: WellRef,
    group: &WellGroup,
    volume: f64,
    mix_after: bool,
    reverse: bool,
) -> Result<Vec<Instruction>, EngineError> {
    const OPERATION: &str = "serial_dilute_rowwise";

    if !volume.is_finite() || volume <= 0.0 {
        return Err(ValidationError::InvalidVolume {
            input: "dilution volume".to_string(),
            value: volume,
        }
        .into());
    }
    inventory.well(source)?;

    let sorted = sort_well_group(group);
    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return Err(ValidationError::EmptySelection(OPERATION).into());
    };
    if first.container != last.container {
        return Err(ValidationError::MixedContainers(OPERATION).into());
    }
    if last.index <= first.index {
        return Err(ValidationError::SelectionTooSmall {
            operation: OPERATION,
            required: 2,
            actual: 1,
        }
        .into());
    }

    let mut span: Vec<WellRef> = inventory
        .wells_from(first.container, first.index, last.index - first.index + 1, false)?
        .into_iter()
        .collect();
    if reverse {
        span.reverse();
    }

    let mut instructions = Vec::with_capacity(span.len());
    instructions.push(Instruction::Transfer {
        source,
        destinations: WellGroup::new(vec![span[0]]),
        volumes: vec![2.0 * volume],
        options: TransferOptions {
            new_group: true,
            ..TransferOptions::default()
        },
    });
    for pair in span.windows(2) {
        instructions.push(Instruction::Transfer {
            source: pair[0],
            destinations: WellGroup::new(vec![pair[1]]),
            volumes: vec![volume],
            options: TransferOptions {
                new_group: false,
                one_tip: true,
                mix_after,
            },
        });
    }

    debug!("Serial dilution over {} well(s)", span.len());
    Ok(instructions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::labware::registry::ContainerTypeRegistry;
    use crate::core::models::ids::ContainerId;

    fn setup() -> (Inventory, ContainerId, WellRef) {
        let registry = ContainerTypeRegistry::builtin();
        let mut inventory = Inventory::new();
        let plate = inventory.add_container("sample_plate", registry.get("96-flat").unwrap());
        let tube = inventory.add_container("sample_source", registry.get("micro-1.5").unwrap());
        let source = WellRef::new(tube, 0);
        inventory.set_volume(source, 500.0).unwrap();
        (inventory, plate, source)
    }

    fn hops(instructions: &[Instruction]) -> Vec<(usize, usize)> {
        instructions
            .iter()
            .skip(1)
            .map(|i| match i {
                Instruction::Transfer {
                    source,
                    destinations,
                    ..
                } => (source.index, destinations.as_slice()[0].index),
                other => panic!("unexpected instruction {:?}", other),
            })
            .collect()
    }

    #[test]
    fn dilutes_left_to_right_across_a_row() {
        let (inventory, plate, source) = setup();
        let row = inventory.wells_from(plate, 0, 12, false).unwrap();
        let instructions = serial_dilute_rowwise(&inventory, source, &row, 50.0, true, false).unwrap();

        assert_eq!(instructions.len(), 12);
        match &instructions[0] {
            Instruction::Transfer {
                source: from,
                destinations,
                volumes,
                ..
            } => {
                assert_eq!(*from, source);
                assert_eq!(destinations.indices(), vec![0]);
                assert_eq!(volumes, &vec![100.0]);
            }
            other => panic!("unexpected instruction {:?}", other),
        }
        let chain = hops(&instructions);
        assert_eq!(chain[0], (0, 1));
        assert_eq!(chain[10], (10, 11));
        assert!(instructions[1..].iter().all(|i| matches!(
            i,
            Instruction::Transfer { options: TransferOptions { one_tip: true, mix_after: true, .. }, volumes, .. }
                if volumes == &vec![50.0]
        )));
    }

    #[test]
    fn reverse_starts_from_the_highest_index() {
        let (inventory, plate, source) = setup();
        let group = WellGroup::new(vec![WellRef::new(plate, 27), WellRef::new(plate, 24)]);
        let instructions = serial_dilute_rowwise(&inventory, source, &group, 20.0, false, true).unwrap();
        assert_eq!(hops(&instructions), vec![(27, 26), (26, 25), (25, 24)]);
    }

    #[test]
    fn rejects_groups_that_do_not_span_a_row() {
        let (mut inventory, plate, source) = setup();
        let single = WellGroup::new(vec![WellRef::new(plate, 3)]);
        assert!(matches!(
            serial_dilute_rowwise(&inventory, source, &single, 10.0, true, false),
            Err(EngineError::Validation(ValidationError::SelectionTooSmall { .. }))
        ));

        let spec = inventory.get_container(plate).unwrap().container_type().clone();
        let other = inventory.add_container("other", &spec);
        let mixed = WellGroup::new(vec![WellRef::new(plate, 0), WellRef::new(other, 5)]);
        assert!(matches!(
            serial_dilute_rowwise(&inventory, source, &mixed, 10.0, true, false),
            Err(EngineError::Validation(ValidationError::MixedContainers(_)))
        ));

        assert!(serial_dilute_rowwise(&inventory, source, &WellGroup::default(), 10.0, true, false).is_err());
    }
}
