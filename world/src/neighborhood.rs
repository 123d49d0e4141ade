//! Diamond (L1-ball) neighborhood geometry and half-unit scoring.
//!
//! Every cell contributes a multiple of one half to a resident's unscaled
//! score, so scores are carried as integer half-units and only divided by the
//! neighborhood size when a satisfaction value is produced. Batch and
//! incremental computations therefore yield bit-identical values.

use schelling_core::CellIndex;

/// Half-units contributed by a neighbor of the same type.
pub const SAME_TYPE_HALVES: i64 = 2;
/// Half-units contributed by an empty neighboring cell.
pub const EMPTY_HALVES: i64 = 1;
/// Half-units contributed by a neighbor of a different type.
pub const OTHER_TYPE_HALVES: i64 = 0;

/// Enumerates the cells of the diamond around `center`, clipped to the grid.
///
/// Cells are yielded in row-major order and the center itself is excluded.
/// The caller guarantees that `center` lies inside a non-empty grid.
pub fn diamond(
    center: CellIndex,
    height: usize,
    width: usize,
    radius: usize,
) -> impl Iterator<Item = CellIndex> {
    let row = center.row(width);
    let column = center.column(width);
    let first_row = row.saturating_sub(radius);
    let last_row = row.saturating_add(radius).min(height - 1);

    (first_row..=last_row).flat_map(move |current_row| {
        let span = radius - row.abs_diff(current_row);
        let first_column = column.saturating_sub(span);
        let last_column = column.saturating_add(span).min(width - 1);
        (first_column..=last_column).filter_map(move |current_column| {
            if current_row == row && current_column == column {
                None
            } else {
                Some(CellIndex::from_row_column(current_row, current_column, width))
            }
        })
    })
}

/// Number of cells in the clipped diamond around `center`, excluding the center.
///
/// The full diamond holds `2r(r+1)` cells. An edge whose margin is smaller
/// than the radius cuts off a triangle of `d²` cells, `d` being the
/// overhang. Where two perpendicular edges both cut deep enough for their
/// triangles to overlap, the doubly removed corner triangle is added back.
/// Opposite edges can never cut the same cell, so no further terms exist.
#[must_use]
pub fn diamond_size(center: CellIndex, height: usize, width: usize, radius: usize) -> usize {
    let row = center.row(width) as i64;
    let column = center.column(width) as i64;
    let radius = radius as i64;

    let left = column;
    let right = width as i64 - 1 - column;
    let top = row;
    let bottom = height as i64 - 1 - row;

    let mut count = 2 * radius * (radius + 1);

    for margin in [left, right, top, bottom] {
        let overhang = radius - margin;
        if overhang > 0 {
            count -= overhang * overhang;
        }
    }

    for (horizontal, vertical) in [(left, top), (left, bottom), (right, top), (right, bottom)] {
        let depth = radius - (horizontal + 1) - (vertical + 1);
        if depth >= 0 {
            count += (depth + 1) * (depth + 2) / 2;
        }
    }

    usize::try_from(count).unwrap_or(0)
}

/// Reports whether `other` falls inside the diamond around `center`.
#[must_use]
pub fn within_diamond(center: CellIndex, other: CellIndex, width: usize, radius: usize) -> bool {
    if center == other {
        return false;
    }
    let rows = center.row(width).abs_diff(other.row(width));
    let columns = center.column(width).abs_diff(other.column(width));
    rows + columns <= radius
}

/// Converts an unscaled half-unit score into a satisfaction value.
///
/// An empty neighborhood leaves nothing to object to and scores `1.0`.
#[must_use]
pub fn satisfaction_from_halves(halves: i64, neighborhood_size: usize) -> f64 {
    if neighborhood_size == 0 {
        return 1.0;
    }
    halves as f64 / (2.0 * neighborhood_size as f64)
}

/// Recovers the unscaled half-unit score behind a satisfaction value.
#[must_use]
pub fn halves_from_satisfaction(satisfaction: f64, neighborhood_size: usize) -> i64 {
    (satisfaction * 2.0 * neighborhood_size as f64).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force_size(center: CellIndex, height: usize, width: usize, radius: usize) -> usize {
        let mut count = 0;
        for row in 0..height {
            for column in 0..width {
                let other = CellIndex::from_row_column(row, column, width);
                let distance = center.row(width).abs_diff(row) + center.column(width).abs_diff(column);
                if other != center && distance <= radius {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn closed_form_matches_brute_force_on_small_grids() {
        for height in 1..=7 {
            for width in 1..=7 {
                for radius in 0..=8 {
                    for index in 0..height * width {
                        let center = CellIndex::new(index);
                        let expected = brute_force_size(center, height, width, radius);
                        assert_eq!(
                            diamond_size(center, height, width, radius),
                            expected,
                            "size mismatch at {index} in {height}x{width} radius {radius}",
                        );
                        assert_eq!(
                            diamond(center, height, width, radius).count(),
                            expected,
                            "enumeration mismatch at {index} in {height}x{width} radius {radius}",
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn interior_cells_hold_full_diamond() {
        let (height, width) = (11, 13);
        for radius in 0..=4 {
            for row in radius..height - radius {
                for column in radius..width - radius {
                    let center = CellIndex::from_row_column(row, column, width);
                    assert_eq!(
                        diamond_size(center, height, width, radius),
                        2 * radius * (radius + 1)
                    );
                }
            }
        }
    }

    #[test]
    fn diamond_skips_center_and_stays_in_bounds() {
        let center = CellIndex::from_row_column(0, 0, 3);
        let cells: Vec<usize> = diamond(center, 3, 3, 1).map(|cell| cell.get()).collect();
        assert_eq!(cells, vec![1, 3]);

        let middle = CellIndex::from_row_column(1, 1, 3);
        let cells: Vec<usize> = diamond(middle, 3, 3, 1).map(|cell| cell.get()).collect();
        assert_eq!(cells, vec![1, 3, 5, 7]);
    }

    #[test]
    fn within_diamond_is_symmetric_and_excludes_center() {
        let width = 5;
        let a = CellIndex::from_row_column(1, 1, width);
        let b = CellIndex::from_row_column(2, 2, width);
        assert!(within_diamond(a, b, width, 2));
        assert!(within_diamond(b, a, width, 2));
        assert!(!within_diamond(a, b, width, 1));
        assert!(!within_diamond(a, a, width, 3));
    }

    #[test]
    fn half_units_round_trip_through_satisfaction() {
        for size in 1..=40 {
            for halves in 0..=(2 * size as i64) {
                let satisfaction = satisfaction_from_halves(halves, size);
                assert_eq!(halves_from_satisfaction(satisfaction, size), halves);
            }
        }
        assert_eq!(satisfaction_from_halves(0, 0), 1.0);
    }
}
