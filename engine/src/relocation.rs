//! Relocation passes with incremental satisfaction bookkeeping.
//!
//! A pass reads from snapshots of both work-lists taken when it starts and
//! writes the next pass's lists into fresh collections. Cells freed during a
//! pass are therefore not offered to later movers until the following pass,
//! and residents that become unsatisfied mid-pass wait for the next one.

use schelling_core::{CellIndex, Event, ResidentType, SimulationError};
use schelling_world::neighborhood::{EMPTY_HALVES, OTHER_TYPE_HALVES, SAME_TYPE_HALVES};

use crate::Simulation;

/// Which side of a move a neighborhood update describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    /// The mover left the center cell, which is now empty.
    Departure,
    /// The mover arrived in the center cell, which was empty.
    Arrival,
}

impl Side {
    /// Half-unit change seen by a neighbor of `neighbor_kind` when a `mover_kind` resident moves.
    fn delta(self, mover_kind: ResidentType, neighbor_kind: ResidentType) -> i64 {
        let occupied = if mover_kind == neighbor_kind {
            SAME_TYPE_HALVES
        } else {
            OTHER_TYPE_HALVES
        };
        match self {
            Self::Departure => EMPTY_HALVES - occupied,
            Self::Arrival => occupied - EMPTY_HALVES,
        }
    }
}

impl Simulation {
    /// Executes one relocation pass.
    ///
    /// Unsatisfied residents are served in list order. Each moves to the first
    /// open cell, in list order, where its satisfaction would meet the
    /// threshold; residents with no such cell keep their place in the list.
    /// Moves and residents that drop below the threshold as a consequence are
    /// reported through `out`. Running a pass with no unsatisfied residents
    /// only advances the iteration counter.
    pub fn iterate(&mut self, out: &mut Vec<Event>) -> Result<(), SimulationError> {
        if self.unsatisfied.is_empty() {
            self.iteration += 1;
            return Ok(());
        }

        let pending = std::mem::take(&mut self.unsatisfied);
        let mut candidates = std::mem::take(&mut self.open_locations);
        let mut survivors = Vec::with_capacity(pending.len());
        let mut unsettled = Vec::new();
        let mut freed = Vec::new();

        for location in pending {
            let resident = self.city.occupant(location)?.ok_or_else(|| {
                SimulationError::consistency(format!(
                    "unsatisfied list references empty cell {location}"
                ))
            })?;
            if resident.is_satisfied(self.threshold) {
                continue;
            }

            let kind = resident.kind();
            match self.find_destination(location, kind, &mut candidates)? {
                Some((position, satisfaction)) => {
                    let destination = candidates.remove(position);
                    self.relocate(location, destination, kind, satisfaction, &mut unsettled, out)?;
                    freed.push(location);
                }
                None => survivors.push(location),
            }
        }

        let relocations = freed.len();
        self.rebuild_unsatisfied(survivors, unsettled)?;
        self.rebuild_open_locations(freed, candidates)?;
        self.iteration += 1;

        tracing::debug!(
            iteration = self.iteration,
            relocations,
            unsatisfied = self.unsatisfied.len(),
            open_locations = self.open_locations.len(),
            "relocation pass completed"
        );
        Ok(())
    }

    /// Finds the first candidate cell that would satisfy a `kind` resident moving from `from`.
    ///
    /// Candidates found occupied are pruned from the list. Returns the
    /// candidate's position together with the satisfaction it would yield.
    fn find_destination(
        &self,
        from: CellIndex,
        kind: ResidentType,
        candidates: &mut Vec<CellIndex>,
    ) -> Result<Option<(usize, f64)>, SimulationError> {
        let mut position = 0;
        while position < candidates.len() {
            let candidate = candidates[position];
            if self.city.occupant(candidate)?.is_some() {
                let _ = candidates.remove(position);
                continue;
            }

            let satisfaction = self.city.satisfaction_if_moved(from, candidate, kind)?;
            if satisfaction >= self.threshold {
                return Ok(Some((position, satisfaction)));
            }
            position += 1;
        }
        Ok(None)
    }

    fn relocate(
        &mut self,
        from: CellIndex,
        to: CellIndex,
        kind: ResidentType,
        satisfaction: f64,
        unsettled: &mut Vec<CellIndex>,
        out: &mut Vec<Event>,
    ) -> Result<(), SimulationError> {
        self.city.relocate(from, to)?;
        let mover = self.city.occupant_mut(to)?.ok_or_else(|| {
            SimulationError::consistency(format!("relocated resident missing from {to}"))
        })?;
        mover.set_satisfaction(satisfaction);
        out.push(Event::ResidentRelocated {
            kind,
            from,
            to,
            satisfaction,
        });

        self.update_neighbors(from, to, kind, Side::Departure, unsettled, out)?;
        self.update_neighbors(to, to, kind, Side::Arrival, unsettled, out)
    }

    /// Applies the incremental score change around `center` after a move.
    ///
    /// `mover` is the cell now holding the resident that moved; it is never
    /// updated as its own neighbor.
    fn update_neighbors(
        &mut self,
        center: CellIndex,
        mover: CellIndex,
        mover_kind: ResidentType,
        side: Side,
        unsettled: &mut Vec<CellIndex>,
        out: &mut Vec<Event>,
    ) -> Result<(), SimulationError> {
        let threshold = self.threshold;
        for neighbor in self.city.neighbors(center)? {
            if neighbor == mover {
                continue;
            }

            let size = self.city.neighborhood_size(neighbor)?;
            let Some(resident) = self.city.occupant_mut(neighbor)? else {
                continue;
            };

            let was_satisfied = resident.is_satisfied(threshold);
            resident.shift_satisfaction(size, side.delta(mover_kind, resident.kind()));

            if was_satisfied && !resident.is_satisfied(threshold) {
                unsettled.push(neighbor);
                out.push(Event::ResidentUnsettled {
                    cell: neighbor,
                    kind: resident.kind(),
                    satisfaction: resident.satisfaction(),
                });
            }
        }
        Ok(())
    }

    /// Surviving entries keep their order and newly unsettled residents follow them.
    fn rebuild_unsatisfied(
        &mut self,
        survivors: Vec<CellIndex>,
        unsettled: Vec<CellIndex>,
    ) -> Result<(), SimulationError> {
        let mut listed = vec![false; self.city.cell_count()];
        let mut rebuilt = Vec::with_capacity(survivors.len() + unsettled.len());

        for location in survivors.into_iter().chain(unsettled) {
            if listed[location.get()] {
                continue;
            }
            let Some(resident) = self.city.occupant(location)? else {
                continue;
            };
            if resident.is_satisfied(self.threshold) {
                continue;
            }
            listed[location.get()] = true;
            rebuilt.push(location);
        }

        self.unsatisfied = rebuilt;
        Ok(())
    }

    /// Cells freed this pass come first, newest first, followed by the still-open candidates.
    fn rebuild_open_locations(
        &mut self,
        freed: Vec<CellIndex>,
        candidates: Vec<CellIndex>,
    ) -> Result<(), SimulationError> {
        let mut rebuilt = Vec::with_capacity(freed.len() + candidates.len());
        for location in freed.into_iter().rev().chain(candidates) {
            if self.city.occupant(location)?.is_none() {
                rebuilt.push(location);
            }
        }

        self.open_locations = rebuilt;
        Ok(())
    }
}
