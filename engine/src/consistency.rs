//! Runtime verification of the city and work-list invariants.

use schelling_core::SimulationError;

use crate::{Phase, Simulation};

/// Largest tolerated gap between a stored score and its recomputed value.
const SATISFACTION_TOLERANCE: f64 = 1e-9;

impl Simulation {
    /// Verifies every invariant the engine maintains.
    ///
    /// Every resident must record the cell that holds it. Once placed, the
    /// city must hold exactly the configured population. Once initialized,
    /// every stored score must match a from-scratch recomputation, the
    /// unsatisfied list must name each unsatisfied resident exactly once,
    /// and the open list must name each empty cell exactly once.
    pub fn check_consistency(&self) -> Result<(), SimulationError> {
        let mut occupied = 0;
        let mut unsatisfied_residents = 0;

        for (location, occupant) in self.city.cells() {
            let Some(resident) = occupant else {
                continue;
            };
            occupied += 1;

            if resident.location() != location {
                return Err(SimulationError::consistency(format!(
                    "resident in cell {location} records location {}",
                    resident.location()
                )));
            }

            if self.phase == Phase::Initialized {
                let expected = self.city.compute_satisfaction(location, resident.kind())?;
                if (expected - resident.satisfaction()).abs() > SATISFACTION_TOLERANCE {
                    return Err(SimulationError::consistency(format!(
                        "resident in cell {location} scores {} but its neighborhood yields {expected}",
                        resident.satisfaction()
                    )));
                }
                if !resident.is_satisfied(self.threshold) {
                    unsatisfied_residents += 1;
                }
            }
        }

        if self.phase >= Phase::Placed && occupied != self.population {
            return Err(SimulationError::consistency(format!(
                "city holds {occupied} residents but the population is {}",
                self.population
            )));
        }

        if self.phase < Phase::Initialized {
            return Ok(());
        }

        let mut listed = vec![false; self.city.cell_count()];
        for &location in &self.unsatisfied {
            let resident = self.city.occupant(location)?.ok_or_else(|| {
                SimulationError::consistency(format!(
                    "unsatisfied list references empty cell {location}"
                ))
            })?;
            if resident.is_satisfied(self.threshold) {
                return Err(SimulationError::consistency(format!(
                    "unsatisfied list references satisfied resident in cell {location}"
                )));
            }
            if std::mem::replace(&mut listed[location.get()], true) {
                return Err(SimulationError::consistency(format!(
                    "unsatisfied list names cell {location} twice"
                )));
            }
        }
        if self.unsatisfied.len() != unsatisfied_residents {
            return Err(SimulationError::consistency(format!(
                "{unsatisfied_residents} residents are unsatisfied but {} are listed",
                self.unsatisfied.len()
            )));
        }

        listed.fill(false);
        for &location in &self.open_locations {
            if self.city.occupant(location)?.is_some() {
                return Err(SimulationError::consistency(format!(
                    "open list references occupied cell {location}"
                )));
            }
            if std::mem::replace(&mut listed[location.get()], true) {
                return Err(SimulationError::consistency(format!(
                    "open list names cell {location} twice"
                )));
            }
        }
        let empty = self.city.cell_count() - occupied;
        if self.open_locations.len() != empty {
            return Err(SimulationError::consistency(format!(
                "{empty} cells are empty but {} are listed as open",
                self.open_locations.len()
            )));
        }

        Ok(())
    }
}
