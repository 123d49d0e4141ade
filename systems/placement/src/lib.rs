#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic placement system that lays out the initial population.
//!
//! Cells are filled in row-major order. For every cell a category is drawn
//! uniformly from the resident types plus one synthetic "empty" category,
//! redrawing while the drawn category has no head count left. The random
//! source is a seeded ChaCha stream so a layout can be replayed exactly.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use schelling_core::{ResidentType, SimulationError};

/// Configuration parameters required to construct the placement system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    seed: u64,
}

impl Config {
    /// Creates a new configuration drawing from the stream identified by `seed`.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed of the random stream.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

/// Pure system that produces row-major population layouts.
#[derive(Debug)]
pub struct Placement {
    seed: u64,
    rng: ChaCha8Rng,
}

impl Placement {
    /// Creates a new placement system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            seed: config.seed(),
            rng: ChaCha8Rng::seed_from_u64(config.seed()),
        }
    }

    /// Seed the system was created with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Draws a layout of `cells` slots holding `population` residents.
    ///
    /// `breakdown` holds the head count of each resident type. The population
    /// must leave at least one cell open and must equal the sum of the
    /// breakdown; otherwise an error is returned, `out` is left untouched
    /// and no randomness is consumed.
    pub fn layout(
        &mut self,
        population: usize,
        breakdown: &[usize],
        cells: usize,
        out: &mut Vec<Option<ResidentType>>,
    ) -> Result<(), SimulationError> {
        if population >= cells {
            return Err(SimulationError::PopulationOverflow {
                population,
                capacity: cells,
            });
        }

        let assigned: usize = breakdown.iter().sum();
        if assigned != population {
            return Err(SimulationError::PopulationMismatch {
                assigned,
                population,
            });
        }

        let mut remaining: Vec<usize> = breakdown.to_vec();
        let empty_category = remaining.len();
        remaining.push(cells - population);

        out.clear();
        out.reserve(cells);
        for _ in 0..cells {
            let category = self.draw_category(&remaining);
            remaining[category] -= 1;
            if category == empty_category {
                out.push(None);
            } else {
                out.push(Some(ResidentType::new(category as u32)));
            }
        }

        tracing::debug!(
            seed = self.seed,
            cells,
            population,
            "drew population layout"
        );
        Ok(())
    }

    fn draw_category(&mut self, remaining: &[usize]) -> usize {
        debug_assert!(
            remaining.iter().any(|count| *count > 0),
            "draw_category requires a non-exhausted category"
        );
        loop {
            let category = self.rng.gen_range(0..remaining.len());
            if remaining[category] > 0 {
                return category;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_skips_exhausted_categories() {
        let mut placement = Placement::new(Config::new(7));
        for _ in 0..64 {
            assert_eq!(placement.draw_category(&[0, 0, 3, 0]), 2);
        }
    }

    #[test]
    fn seed_is_retained() {
        let placement = Placement::new(Config::new(0xdead_beef));
        assert_eq!(placement.seed(), 0xdead_beef);
    }
}
