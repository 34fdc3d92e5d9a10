//! Removal of coordinate components that vanish for every node.
use crate::error::{Axis, ConversionError};
use log::info;
use nalgebra::DMatrix;

/// Absolute tolerance below which a coordinate is considered zero.
pub const DEFAULT_PRUNE_TOLERANCE: f64 = 1e-12;

/// Removes the z and/or y columns of a `n x 3` coordinate matrix.
///
/// The z column is examined and removed first, so the remaining columns are
///
/// | `prune_y` | `prune_z` | columns |
/// |---|---|---|
/// | no | no | `x, y, z` |
/// | no | yes | `x, y` |
/// | yes | no | `x, z` |
/// | yes | yes | `x` |
///
/// Fails with [`ConversionError::LossyPrune`] if a removed column has an entry with absolute
/// value above `tolerance`. The input is consumed either way.
///
/// # Panics
///
/// Panics if `points` does not have three columns.
pub fn prune_coordinates(
    mut points: DMatrix<f64>,
    prune_y: bool,
    prune_z: bool,
    tolerance: f64,
) -> Result<DMatrix<f64>, ConversionError> {
    assert_eq!(points.ncols(), 3, "Pruning expects three coordinate columns");

    if prune_z {
        points = prune_column(points, 2, Axis::Z, tolerance)?;
    }

    if prune_y {
        points = prune_column(points, 1, Axis::Y, tolerance)?;
    }

    if prune_y || prune_z {
        info!("Pruned coordinates to geometric dimension {}", points.ncols());
    }
    Ok(points)
}

fn prune_column(points: DMatrix<f64>, column: usize, axis: Axis, tolerance: f64) -> Result<DMatrix<f64>, ConversionError> {
    if let Some((node, &value)) = points
        .column(column)
        .iter()
        .enumerate()
        .find(|(_, value)| !(value.abs() <= tolerance))
    {
        return Err(ConversionError::LossyPrune { axis, node, value });
    }
    Ok(points.remove_column(column))
}
