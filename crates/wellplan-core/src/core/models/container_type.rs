use serde::Serialize;
use thiserror::Error;

/// Immutable description of a container type.
///
/// Wells are laid out row-major on a grid `col_count` wide, so well `i` sits at
/// row `i / col_count` and column `i % col_count`. All volumes are in microliters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerTypeSpec {
    pub shortname: String,
    pub well_count: usize,
    pub col_count: usize,
    pub well_volume: f64,
    pub dead_volume: f64,
    pub safe_min_volume: f64,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("Invalid container type '{shortname}': {reason}")]
pub struct InvalidContainerTypeError {
    pub shortname: String,
    pub reason: String,
}

impl ContainerTypeSpec {
    /// Builds a spec and checks its physical invariants.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidContainerTypeError`] when the well count or grid width is zero, the
    /// width does not divide the well count, a volume is negative or non-finite, or
    /// `dead_volume + safe_min_volume` does not leave room below `well_volume`.
    pub fn new(
        shortname: &str,
        well_count: usize,
        col_count: usize,
        well_volume: f64,
        dead_volume: f64,
        safe_min_volume: f64,
    ) -> Result<Self, InvalidContainerTypeError> {
        let invalid = |reason: String| InvalidContainerTypeError {
            shortname: shortname.to_string(),
            reason,
        };

        if well_count == 0 {
            return Err(invalid("well count must be at least 1".to_string()));
        }
        if col_count == 0 || well_count % col_count != 0 {
            return Err(invalid(format!(
                "column count {} does not divide well count {}",
                col_count, well_count
            )));
        }
        if !well_volume.is_finite() || well_volume <= 0.0 {
            return Err(invalid(format!(
                "well volume must be positive, got {}",
                well_volume
            )));
        }
        if !dead_volume.is_finite() || dead_volume < 0.0 {
            return Err(invalid(format!(
                "dead volume must be non-negative, got {}",
                dead_volume
            )));
        }
        if !safe_min_volume.is_finite() || safe_min_volume < 0.0 {
            return Err(invalid(format!(
                "safe minimum volume must be non-negative, got {}",
                safe_min_volume
            )));
        }
        if dead_volume + safe_min_volume >= well_volume {
            return Err(invalid(format!(
                "dead volume ({}) plus safe minimum volume ({}) must stay below the well volume ({})",
                dead_volume, safe_min_volume, well_volume
            )));
        }

        Ok(Self {
            shortname: shortname.to_string(),
            well_count,
            col_count,
            well_volume,
            dead_volume,
            safe_min_volume,
        })
    }

    pub fn row_count(&self) -> usize {
        self.well_count / self.col_count
    }

    /// Grid coordinates `(row, column)` of a well index.
    pub fn coordinates(&self, index: usize) -> (usize, usize) {
        (index / self.col_count, index % self.col_count)
    }

    pub fn index_at(&self, row: usize, col: usize) -> usize {
        row * self.col_count + col
    }

    /// Position of a well in a top-to-bottom, then left-to-right fill.
    pub fn column_major_position(&self, index: usize) -> usize {
        let (row, col) = self.coordinates(index);
        col * self.row_count() + row
    }

    pub fn index_from_column_major(&self, position: usize) -> usize {
        let rows = self.row_count();
        self.index_at(position % rows, position / rows)
    }

    /// Position of a well in the requested fill order.
    pub fn fill_position(&self, index: usize, columnwise: bool) -> usize {
        if columnwise {
            self.column_major_position(index)
        } else {
            index
        }
    }

    /// Well index at a position of the requested fill order.
    pub fn index_at_fill_position(&self, position: usize, columnwise: bool) -> usize {
        if columnwise {
            self.index_from_column_major(position)
        } else {
            position
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pcr_plate() -> ContainerTypeSpec {
        ContainerTypeSpec::new("96-pcr", 96, 12, 160.0, 3.0, 5.0).unwrap()
    }

    #[test]
    fn new_accepts_valid_spec() {
        let spec = pcr_plate();
        assert_eq!(spec.row_count(), 8);
        assert_eq!(spec.shortname, "96-pcr");
    }

    #[test]
    fn new_rejects_margins_filling_the_well() {
        let result = ContainerTypeSpec::new("tiny", 1, 1, 10.0, 5.0, 5.0);
        assert!(result.is_err());
    }

    #[test]
    fn new_rejects_zero_wells_and_uneven_grid() {
        assert!(ContainerTypeSpec::new("none", 0, 1, 10.0, 1.0, 1.0).is_err());
        assert!(ContainerTypeSpec::new("odd", 10, 3, 10.0, 1.0, 1.0).is_err());
    }

    #[test]
    fn new_rejects_negative_volumes() {
        assert!(ContainerTypeSpec::new("neg", 1, 1, 10.0, -1.0, 1.0).is_err());
        assert!(ContainerTypeSpec::new("neg", 1, 1, 10.0, 1.0, f64::NAN).is_err());
        assert!(ContainerTypeSpec::new("neg", 1, 1, 0.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn coordinates_follow_row_major_layout() {
        let spec = pcr_plate();
        assert_eq!(spec.coordinates(0), (0, 0));
        assert_eq!(spec.coordinates(13), (1, 1));
        assert_eq!(spec.coordinates(95), (7, 11));
        assert_eq!(spec.index_at(6, 7), 79);
    }

    #[test]
    fn column_major_positions_round_trip_through_indices() {
        let spec = pcr_plate();
        assert_eq!(spec.column_major_position(0), 0);
        assert_eq!(spec.column_major_position(12), 1);
        assert_eq!(spec.column_major_position(1), 8);
        assert_eq!(spec.index_from_column_major(8), 1);
        assert_eq!(spec.index_from_column_major(16), 2);
        assert_eq!(spec.index_at_fill_position(5, false), 5);
        assert_eq!(spec.fill_position(14, true), 17);
    }
}
