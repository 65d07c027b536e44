use super::error::{EngineError, ValidationError};
use crate::core::models::ids::{ContainerId, WellRef};
use crate::core::models::inventory::Inventory;
use crate::core::models::selection::{WellCollection, WellGroup};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Shape {
    pub rows: usize,
    pub columns: usize,
}

impl Shape {
    pub fn area(&self) -> usize {
        self.rows * self.columns
    }
}

/// Result of [`stamp_shape`]: a rectangle addressable by one multi-channel operation plus
/// the wells left over.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StampShape {
    /// Top-left corner of the largest rectangle found.
    pub start_well: WellRef,
    pub shape: Shape,
    pub remaining_wells: WellGroup,
}

/// Finds the largest axis-aligned rectangle of wells inside a selection.
///
/// The search runs over a sorted copy of the selection. Every well is tried as a top-left
/// corner; for each corner the rectangle grows downwards while the row below still offers a
/// contiguous run, keeping the widest run seen so far as the limit. The biggest area wins;
/// ties keep the earliest corner and, for one corner, the widest shape. A rectangle never
/// spans two containers.
///
/// With `full` set, only a rectangle covering the whole selection counts: otherwise the
/// shape is reported as `0 x 0` and every well is returned as remaining.
///
/// `remaining_wells` keeps the caller's order.
///
/// # Errors
///
/// Fails with a validation error if the selection is empty or refers to unknown wells.
pub fn stamp_shape<T: WellCollection + ?Sized>(
    inventory: &Inventory,
    wells: &T,
    full: bool,
) -> Result<StampShape, EngineError> {
    let given = wells.well_refs(inventory)?;
    let mut sorted = given.clone();
    sorted.sort();
    sorted.dedup();
    if sorted.is_empty() {
        return Err(ValidationError::EmptySelection("stamp_shape").into());
    }

    let present: HashSet<WellRef> = sorted.iter().copied().collect();
    let mut best: Option<(WellRef, Shape)> = None;

    for &corner in &sorted {
        let spec = inventory.container_type_of(corner)?;
        let (row0, col0) = spec.coordinates(corner.index);
        let mut width_limit = spec.col_count - col0;

        for row in row0..spec.row_count() {
            let width = (0..width_limit)
                .take_while(|&offset| {
                    present.contains(&WellRef::new(
                        corner.container,
                        spec.index_at(row, col0 + offset),
                    ))
                })
                .count();
            if width == 0 {
                break;
            }
            width_limit = width;

            let candidate = Shape {
                rows: row - row0 + 1,
                columns: width,
            };
            if best.is_none_or(|(_, shape)| candidate.area() > shape.area()) {
                best = Some((corner, candidate));
            }
        }
    }

    // Every corner yields at least a 1 x 1 shape, so `best` is always set here.
    let (start_well, shape) = best.ok_or(ValidationError::EmptySelection("stamp_shape"))?;
    let spec = inventory.container_type_of(start_well)?;
    let (row0, col0) = spec.coordinates(start_well.index);
    let inside = |well: &WellRef| {
        if well.container != start_well.container {
            return false;
        }
        let (row, col) = spec.coordinates(well.index);
        (row0..row0 + shape.rows).contains(&row) && (col0..col0 + shape.columns).contains(&col)
    };

    let remaining: WellGroup = given.iter().copied().filter(|w| !inside(w)).collect();

    if full && !remaining.is_empty() {
        return Ok(StampShape {
            start_well,
            shape: Shape::default(),
            remaining_wells: given.into(),
        });
    }

    Ok(StampShape {
        start_well,
        shape,
        remaining_wells: remaining,
    })
}

/// Whether a group looks like the output of a column-major fill.
///
/// True iff every well lies in one container and their top-to-bottom, left-to-right
/// positions form a single run without gaps or repeats. The run may end part-way down a
/// column.
pub fn is_columnwise(inventory: &Inventory, wells: &WellGroup) -> Result<bool, EngineError> {
    let Some(first) = wells.first() else {
        return Err(ValidationError::EmptySelection("is_columnwise").into());
    };
    let container: ContainerId = first.container;
    if wells.iter().any(|w| w.container != container) {
        return Ok(false);
    }

    let spec = inventory.get_container(container)?.container_type();
    let mut positions = Vec::with_capacity(wells.len());
    for well in wells {
        inventory.well(*well)?;
        positions.push(spec.column_major_position(well.index));
    }
    positions.sort_unstable();

    Ok(positions.windows(2).all(|pair| pair[1] == pair[0] + 1))
}
