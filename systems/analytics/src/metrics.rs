use schelling_core::CitySnapshot;

/// Mean of `count` values summing to `total`, `0.0` when there are none.
#[must_use]
pub fn mean(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

/// Share of orthogonally adjacent occupied pairs whose residents share a type.
///
/// Each pair is counted once by looking right and down from every cell.
/// Returns `0.0` when no two residents touch.
#[must_use]
pub fn like_neighbor_share(snapshot: &CitySnapshot) -> f64 {
    let width = snapshot.width;
    let mut pairs = 0;
    let mut alike = 0u32;

    for (index, cell) in snapshot.cells.iter().enumerate() {
        let Some(occupant) = cell else {
            continue;
        };

        let right = (index % width + 1 < width).then(|| index + 1);
        let below = Some(index + width).filter(|&next| next < snapshot.cells.len());
        for neighbor in [right, below].into_iter().flatten() {
            if let Some(other) = &snapshot.cells[neighbor] {
                pairs += 1;
                if other.kind == occupant.kind {
                    alike += 1;
                }
            }
        }
    }

    mean(f64::from(alike), pairs)
}

#[cfg(test)]
mod tests {
    use schelling_core::{OccupantSnapshot, ResidentType};

    use super::*;

    fn grid(width: usize, kinds: &[Option<u32>]) -> CitySnapshot {
        CitySnapshot {
            height: kinds.len() / width,
            width,
            radius: 1,
            iteration: 0,
            threshold: 0.5,
            unsatisfied: 0,
            open_locations: kinds.iter().filter(|kind| kind.is_none()).count(),
            cells: kinds
                .iter()
                .map(|kind| {
                    kind.map(|kind| OccupantSnapshot {
                        kind: ResidentType::new(kind),
                        satisfaction: 1.0,
                        satisfied: true,
                    })
                })
                .collect(),
        }
    }

    #[test]
    fn segregated_halves_share_most_borders() {
        let snapshot = grid(2, &[Some(0), Some(1), Some(0), Some(1)]);
        assert_eq!(like_neighbor_share(&snapshot), 0.5);
    }

    #[test]
    fn rows_do_not_wrap() {
        let snapshot = grid(2, &[Some(0), None, Some(0), None]);
        assert_eq!(like_neighbor_share(&snapshot), 1.0);

        let snapshot = grid(2, &[None, Some(0), Some(0), None]);
        assert_eq!(like_neighbor_share(&snapshot), 0.0);
    }

    #[test]
    fn mean_of_nothing_is_zero() {
        assert_eq!(mean(0.0, 0), 0.0);
        assert_eq!(mean(3.0, 4), 0.75);
    }
}
