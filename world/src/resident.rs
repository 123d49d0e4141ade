//! Residents owned by the city's occupancy slots.

use schelling_core::{CellIndex, ResidentType};

use crate::neighborhood::{halves_from_satisfaction, satisfaction_from_halves};

/// Agent with an immutable type and engine-controlled location and satisfaction.
///
/// Whether a resident is satisfied is never stored; it is derived from the
/// score and the threshold in force via [`Resident::is_satisfied`].
#[derive(Clone, Debug, PartialEq)]
pub struct Resident {
    kind: ResidentType,
    location: CellIndex,
    satisfaction: f64,
}

impl Resident {
    /// Creates a resident of `kind` destined for `location` with a zero score.
    #[must_use]
    pub const fn new(kind: ResidentType, location: CellIndex) -> Self {
        Self {
            kind,
            location,
            satisfaction: 0.0,
        }
    }

    /// Type of the resident.
    #[must_use]
    pub const fn kind(&self) -> ResidentType {
        self.kind
    }

    /// Cell currently holding the resident.
    #[must_use]
    pub const fn location(&self) -> CellIndex {
        self.location
    }

    /// Current satisfaction score in `[0, 1]`.
    #[must_use]
    pub const fn satisfaction(&self) -> f64 {
        self.satisfaction
    }

    /// Reports whether the score meets `threshold`.
    #[must_use]
    pub fn is_satisfied(&self, threshold: f64) -> bool {
        self.satisfaction >= threshold
    }

    /// Overwrites the satisfaction score.
    pub fn set_satisfaction(&mut self, satisfaction: f64) {
        self.satisfaction = satisfaction;
    }

    /// Applies a half-unit delta to the unscaled score of a neighborhood of `neighborhood_size` cells.
    pub fn shift_satisfaction(&mut self, neighborhood_size: usize, delta_halves: i64) {
        let halves = halves_from_satisfaction(self.satisfaction, neighborhood_size);
        self.satisfaction = satisfaction_from_halves(halves + delta_halves, neighborhood_size);
    }

    pub(crate) fn set_location(&mut self, location: CellIndex) {
        self.location = location;
    }
}
