#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative city state for the Schelling segregation engine.
//!
//! The [`City`] is the sole owner of every [`Resident`]. Each cell holds an
//! optional occupant and the resident's recorded location always names the
//! cell that holds it. Work-lists kept by the engine refer to residents by
//! [`CellIndex`] only.

pub mod neighborhood;
mod resident;

pub use resident::Resident;

use schelling_core::{max_radius, CellIndex, ResidentType, SimulationError};

use self::neighborhood::{
    diamond, diamond_size, satisfaction_from_halves, within_diamond, EMPTY_HALVES,
    OTHER_TYPE_HALVES, SAME_TYPE_HALVES,
};

/// Fixed-size grid of optional residents.
#[derive(Clone, Debug)]
pub struct City {
    height: usize,
    width: usize,
    radius: usize,
    slots: Vec<Option<Resident>>,
}

impl City {
    /// Creates an empty city with the provided dimensions and neighborhood radius.
    pub fn new(height: usize, width: usize, radius: usize) -> Result<Self, SimulationError> {
        if height == 0 || width == 0 {
            return Err(SimulationError::InvalidDimensions { height, width });
        }
        let cells = height
            .checked_mul(width)
            .ok_or(SimulationError::InvalidDimensions { height, width })?;
        let limit = max_radius(height, width);
        if radius > limit {
            return Err(SimulationError::InvalidRadius { radius, limit });
        }

        Ok(Self {
            height,
            width,
            radius,
            slots: vec![None; cells],
        })
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Radius of the diamond neighborhood.
    #[must_use]
    pub const fn radius(&self) -> usize {
        self.radius
    }

    /// Number of cells in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn population(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Reports whether `location` lies inside the grid.
    #[must_use]
    pub fn contains(&self, location: CellIndex) -> bool {
        location.get() < self.slots.len()
    }

    /// Number of cells in the diamond around `location`, excluding `location` itself.
    pub fn neighborhood_size(&self, location: CellIndex) -> Result<usize, SimulationError> {
        let _ = self.check(location)?;
        Ok(diamond_size(location, self.height, self.width, self.radius))
    }

    /// Cells in the diamond around `location`, in row-major order.
    ///
    /// The iterator does not borrow the city, so callers may mutate occupants
    /// while walking a neighborhood.
    pub fn neighbors(
        &self,
        location: CellIndex,
    ) -> Result<impl Iterator<Item = CellIndex>, SimulationError> {
        let _ = self.check(location)?;
        Ok(diamond(location, self.height, self.width, self.radius))
    }

    /// Computes from scratch how satisfied a resident of `kind` would be at `location`.
    ///
    /// Same-type neighbors count fully, empty cells count half and other
    /// types count nothing; the total is averaged over the neighborhood size.
    /// Whatever occupies `location` itself is ignored.
    pub fn compute_satisfaction(
        &self,
        location: CellIndex,
        kind: ResidentType,
    ) -> Result<f64, SimulationError> {
        let halves = self.score_halves(location, kind)?;
        Ok(satisfaction_from_halves(halves, self.neighborhood_size(location)?))
    }

    /// Satisfaction the resident at `from` would have after moving to `to`.
    ///
    /// The vacated cell counts as empty when it falls inside the destination's
    /// neighborhood.
    pub fn satisfaction_if_moved(
        &self,
        from: CellIndex,
        to: CellIndex,
        kind: ResidentType,
    ) -> Result<f64, SimulationError> {
        let _ = self.check(from)?;
        let mut halves = self.score_halves(to, kind)?;
        if within_diamond(to, from, self.width, self.radius) {
            halves += EMPTY_HALVES - self.contribution(from, kind);
        }
        Ok(satisfaction_from_halves(halves, self.neighborhood_size(to)?))
    }

    /// Stores `resident` at `location`, returning any occupant it displaced.
    ///
    /// The resident's recorded location is overwritten with `location`.
    pub fn place(
        &mut self,
        resident: Option<Resident>,
        location: CellIndex,
    ) -> Result<Option<Resident>, SimulationError> {
        let index = self.check(location)?;
        let mut resident = resident.ok_or(SimulationError::NullResident { location })?;
        resident.set_location(location);
        Ok(self.slots[index].replace(resident))
    }

    /// Returns the resident occupying `location`, if any.
    pub fn occupant(&self, location: CellIndex) -> Result<Option<&Resident>, SimulationError> {
        let index = self.check(location)?;
        Ok(self.slots[index].as_ref())
    }

    /// Returns mutable access to the resident occupying `location`, if any.
    pub fn occupant_mut(
        &mut self,
        location: CellIndex,
    ) -> Result<Option<&mut Resident>, SimulationError> {
        let index = self.check(location)?;
        Ok(self.slots[index].as_mut())
    }

    /// Moves the resident at `from` into the empty cell `to`.
    pub fn relocate(&mut self, from: CellIndex, to: CellIndex) -> Result<(), SimulationError> {
        let source = self.check(from)?;
        let destination = self.check(to)?;

        if self.slots[destination].is_some() {
            return Err(SimulationError::consistency(format!(
                "relocation target {to} is already occupied"
            )));
        }

        let mut resident = self.slots[source].take().ok_or_else(|| {
            SimulationError::consistency(format!("relocation source {from} is empty"))
        })?;
        resident.set_location(to);
        self.slots[destination] = Some(resident);
        Ok(())
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        self.slots.fill(None);
    }

    /// Iterator over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellIndex, Option<&Resident>)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| (CellIndex::new(index), slot.as_ref()))
    }

    fn check(&self, location: CellIndex) -> Result<usize, SimulationError> {
        if self.contains(location) {
            Ok(location.get())
        } else {
            Err(SimulationError::InvalidLocation {
                location,
                cells: self.slots.len(),
            })
        }
    }

    fn contribution(&self, location: CellIndex, kind: ResidentType) -> i64 {
        match &self.slots[location.get()] {
            Some(neighbor) if neighbor.kind() == kind => SAME_TYPE_HALVES,
            Some(_) => OTHER_TYPE_HALVES,
            None => EMPTY_HALVES,
        }
    }

    fn score_halves(&self, location: CellIndex, kind: ResidentType) -> Result<i64, SimulationError> {
        Ok(self
            .neighbors(location)?
            .map(|neighbor| self.contribution(neighbor, kind))
            .sum())
    }
}
